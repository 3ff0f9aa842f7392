// Subprocess-backed runtime adapter: the interpreter is a long-lived child
// process fed one expression at a time over a length-prefixed framing
// protocol (the framing survives embedded newlines in captured output,
// per the adapter contract's design note).
//
// Each call writes the expression to a scratch file and sends the file's
// path down the child's stdin, rather than inlining the expression as a
// quoted shell/Python argument — this sidesteps quoting edge cases for
// multi-line expressions without giving up a persistent interpreter.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};

use super::{RuntimeAdapter, TestOutput};
use crate::extract::Test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Python,
    Shell,
}

/// A subprocess-backed `RuntimeAdapter`. `python()`/`shell()` select the
/// interpreter binary and bootstrap harness; both speak the same
/// `##BEGIN##\n<len>\n<payload>\n##END:<code>##\n` framing.
pub struct ProcessRuntime {
    kind: Kind,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    scratch_dir: Option<tempfile::TempDir>,
    call_count: u64,
}

impl ProcessRuntime {
    pub fn python() -> Self {
        Self { kind: Kind::Python, child: None, stdin: None, stdout: None, scratch_dir: None, call_count: 0 }
    }

    pub fn shell() -> Self {
        Self { kind: Kind::Shell, child: None, stdin: None, stdout: None, scratch_dir: None, call_count: 0 }
    }

    fn bootstrap_command(&self) -> Command {
        match self.kind {
            Kind::Python => {
                let mut cmd = Command::new("python3");
                cmd.arg("-u").arg("-c").arg(PYTHON_HARNESS);
                cmd
            }
            Kind::Shell => {
                let mut cmd = Command::new("/bin/sh");
                cmd.arg("-s");
                cmd
            }
        }
    }

    fn scratch_path(&mut self) -> Result<std::path::PathBuf> {
        let dir = self
            .scratch_dir
            .get_or_insert_with(|| tempfile::tempdir().expect("scratch dir"));
        self.call_count += 1;
        Ok(dir.path().join(format!("expr-{}.src", self.call_count)))
    }

    /// Write `src` to a fresh scratch file, send its path to the child, and
    /// read back one framed response.
    fn dispatch(&mut self, src: &str) -> Result<TestOutput> {
        let path = self.scratch_path()?;
        std::fs::write(&path, src).with_context(|| format!("writing scratch file {path:?}"))?;

        let stdin = self.stdin.as_mut().ok_or_else(|| anyhow!("runtime not started"))?;
        writeln!(stdin, "{}", path.display()).context("writing expression path to runtime stdin")?;
        stdin.flush()?;

        let stdout = self.stdout.as_mut().ok_or_else(|| anyhow!("runtime not started"))?;
        read_framed_response(stdout)
    }
}

/// `##BEGIN##\n<len>\n<payload>\n##END:<code>##\n`
fn read_framed_response(reader: &mut BufReader<ChildStdout>) -> Result<TestOutput> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            bail!("runtime closed its stdout before a response was framed");
        }
        if line.trim_end() == "##BEGIN##" {
            break;
        }
    }

    line.clear();
    reader.read_line(&mut line)?;
    let len: usize = line.trim().parse().context("parsing framed response length")?;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).context("reading framed response payload")?;
    let payload = String::from_utf8_lossy(&payload).into_owned();

    // The payload's length is exact, so the newline that follows it on the
    // wire is still unconsumed; read it off before the terminator line.
    line.clear();
    reader.read_line(&mut line)?;

    line.clear();
    reader.read_line(&mut line)?;
    let terminator = line.trim_end();
    let code = terminator
        .strip_prefix("##END:")
        .and_then(|s| s.strip_suffix("##"))
        .and_then(|s| s.parse::<u8>().ok())
        .unwrap_or(0);

    Ok(if code == 0 { TestOutput::ok(payload) } else { TestOutput::error(payload) })
}

impl RuntimeAdapter for ProcessRuntime {
    fn start(&mut self) -> Result<()> {
        let mut child = self
            .bootstrap_command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawning {:?} runtime", self.kind))?;

        let stdin = child.stdin.take().ok_or_else(|| anyhow!("no stdin pipe"))?;
        let stdout = child.stdout.take().ok_or_else(|| anyhow!("no stdout pipe"))?;

        if self.kind == Kind::Shell {
            // The shell's bootstrap loop is sent as the first thing on
            // stdin rather than baked into argv, matching how a real `sh
            // -s` invocation is normally fed a script over its stdin.
            let mut stdin = stdin;
            stdin
                .write_all(SHELL_HARNESS.as_bytes())
                .context("writing shell runtime bootstrap")?;
            self.stdin = Some(stdin);
        } else {
            self.stdin = Some(stdin);
        }

        self.stdout = Some(BufReader::new(stdout));
        self.child = Some(child);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.child.is_some()
    }

    fn init_for_tests(&mut self, config: &Map<String, Value>) -> Result<()> {
        let init_key = match self.kind {
            Kind::Python => "python.init",
            Kind::Shell => "shell.init",
        };
        if let Some(Value::String(preamble)) = config.get(init_key) {
            self.dispatch(preamble)?;
        }
        Ok(())
    }

    fn exec_test_expr(&mut self, test: &Test, _options: &Map<String, Value>) -> Result<TestOutput> {
        self.dispatch(&test.expr)
    }

    fn handle_test_match(&mut self, vars: &HashMap<String, Value>) -> Result<()> {
        if vars.is_empty() {
            return Ok(());
        }
        let assignments: Vec<String> = vars
            .iter()
            .map(|(name, value)| match self.kind {
                Kind::Python => format!("{name} = {}", python_literal(value)),
                Kind::Shell => format!("{name}={}", shell_literal(value)),
            })
            .collect();
        self.dispatch(&assignments.join("\n"))?;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stdin.take();
        self.stdout.take();
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        Ok(())
    }
}

impl Drop for ProcessRuntime {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn python_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

fn shell_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', r"'\''")),
        other => other.to_string(),
    }
}

const PYTHON_HARNESS: &str = r#"
import sys, io, contextlib, traceback

def _groktest_loop():
    while True:
        path = sys.stdin.readline()
        if not path:
            break
        path = path.rstrip("\n")
        if not path:
            continue
        with open(path, "r") as f:
            src = f.read()
        buf = io.StringIO()
        code = 0
        try:
            with contextlib.redirect_stdout(buf):
                try:
                    result = eval(compile(src, path, "eval"), globals())
                    if result is not None:
                        print(repr(result))
                except SyntaxError:
                    exec(compile(src, path, "exec"), globals())
        except Exception:
            traceback.print_exc(file=buf)
            code = 1
        data = buf.getvalue().encode("utf-8")
        sys.stdout.write("##BEGIN##\n")
        sys.stdout.write(str(len(data)) + "\n")
        sys.stdout.flush()
        sys.stdout.buffer.write(data)
        sys.stdout.buffer.flush()
        sys.stdout.write("\n##END:%d##\n" % code)
        sys.stdout.flush()

_groktest_loop()
"#;

const SHELL_HARNESS: &str = r#"
while IFS= read -r path; do
  [ -z "$path" ] && continue
  out=$(. "$path" 2>&1)
  code=$?
  len=$(printf '%s' "$out" | wc -c | tr -d ' ')
  printf '##BEGIN##\n%s\n' "$len"
  printf '%s' "$out"
  printf '\n##END:%d##\n' "$code"
done
"#;
