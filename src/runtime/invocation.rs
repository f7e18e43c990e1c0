//! Structured container runtime invocations

use std::fmt;

/// One runtime call: a program and its argument vector.
///
/// Arguments are passed to the process as-is; the [`fmt::Display`] rendering
/// is shell-quoted and only used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Push `flag` when `enabled`
    pub fn flag_if(self, flag: &str, enabled: bool) -> Self {
        if enabled {
            self.arg(flag)
        } else {
            self
        }
    }

    /// Push `flag value` when a value is present
    pub fn opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.arg(flag).arg(v),
            None => self,
        }
    }

    /// Push `flag value` once per value
    pub fn repeated<'a, I>(mut self, flag: &str, values: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        for value in values {
            self = self.arg(flag).arg(value.as_str());
        }
        self
    }

    /// Shell-quoted rendering, e.g. `docker rm 'my lab'`
    pub fn render(&self) -> String {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_args() {
        let inv = Invocation::new("docker")
            .arg("build")
            .flag_if("--no-cache", true)
            .flag_if("--pull", false)
            .opt("--memory", Some("16g"))
            .opt("--cpus", None)
            .repeated("-v", &["/a:/a".to_string(), "/b:/b".to_string()]);

        assert_eq!(inv.program, "docker");
        assert_eq!(
            inv.args,
            vec!["build", "--no-cache", "--memory", "16g", "-v", "/a:/a", "-v", "/b:/b"]
        );
    }

    #[test]
    fn test_render_quotes_whitespace() {
        let inv = Invocation::new("docker").args(["exec", "lab", "python train.py"]);
        assert_eq!(inv.render(), "docker exec lab 'python train.py'");
    }

    #[test]
    fn test_render_does_not_expand() {
        let inv = Invocation::new("docker").args(["run", "-v", "$HOME/x:/x"]);
        assert_eq!(inv.to_string(), "docker run -v '$HOME/x:/x'");
    }
}
