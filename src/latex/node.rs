//! LaTeX markup nodes.

use std::fmt;

use super::escape::escape_special_chars;

/// Command argument or option value: literal text or a nested command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Literal text, inserted verbatim
    Literal(String),
    /// Nested command, inserted in its rendered form
    Command(Command),
}

impl Arg {
    /// Rendered form of the argument.
    pub fn as_str(&self) -> &str {
        match self {
            Arg::Literal(s) => s,
            Arg::Command(cmd) => cmd.as_str(),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Literal(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Literal(s)
    }
}

impl From<Command> for Arg {
    fn from(cmd: Command) -> Self {
        Arg::Command(cmd)
    }
}

/// Bracketed command option, `key=value` or a bare value when the key is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    /// Option key, may be empty
    pub key: String,
    /// Option value
    pub value: Arg,
}

impl CommandOption {
    /// Create a keyed option.
    pub fn new(key: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create an option without a key.
    pub fn bare(value: impl Into<Arg>) -> Self {
        Self::new("", value)
    }
}

impl fmt::Display for CommandOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}", self.value.as_str())
        } else {
            write!(f, "{}={}", self.key, self.value.as_str())
        }
    }
}

/// A LaTeX command such as `\usepackage[margin=1in]{geometry}`.
///
/// The rendered line is computed whenever the command changes and cached, so
/// a finished command is rendered exactly once no matter how often it is
/// serialized or nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<Arg>,
    options: Vec<CommandOption>,
    rendered: String,
}

impl Command {
    /// Create a command with no arguments or options.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_parts(name, Vec::new(), Vec::new())
    }

    /// Create a command from all of its parts.
    pub fn with_parts(
        name: impl Into<String>,
        args: Vec<Arg>,
        options: Vec<CommandOption>,
    ) -> Self {
        let mut cmd = Self {
            name: name.into(),
            args,
            options,
            rendered: String::new(),
        };
        cmd.rendered = cmd.render();
        cmd
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self.rendered = self.render();
        self
    }

    /// Append an option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.options.push(CommandOption::new(key, value));
        self.rendered = self.render();
        self
    }

    /// Command name without the leading backslash.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments in order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Options in order.
    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// The rendered line.
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    fn render(&self) -> String {
        let mut args = String::new();
        for arg in &self.args {
            args.push('{');
            args.push_str(arg.as_str());
            args.push('}');
        }

        let options = if self.options.is_empty() {
            String::new()
        } else {
            let joined: Vec<String> = self.options.iter().map(|o| o.to_string()).collect();
            format!("[{}]", joined.join(","))
        };

        // \begin{name}[opts] but \cmd[opts]{args}
        if self.name == "begin" {
            format!("\\{}{}{}", self.name, args, options)
        } else {
            format!("\\{}{}{}", self.name, options, args)
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Running text, escaped once when created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    /// Escape `text` and wrap it.
    pub fn new(text: &str) -> Self {
        Self(escape_special_chars(text))
    }

    /// The escaped text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `\begin{name} ... \end{name}` environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    name: String,
    body: Vec<Node>,
    begin: Command,
    end: Command,
}

impl Environment {
    /// Create an environment without options.
    pub fn new(name: impl Into<String>, body: Vec<Node>) -> Self {
        Self::with_options(name, body, Vec::new())
    }

    /// Create an environment whose `\begin` carries `options`.
    pub fn with_options(
        name: impl Into<String>,
        body: Vec<Node>,
        options: Vec<CommandOption>,
    ) -> Self {
        let name = name.into();
        let begin = Command::with_parts("begin", vec![Arg::from(name.as_str())], options);
        let end = Command::new("end").arg(name.as_str());
        Self {
            name,
            body,
            begin,
            end,
        }
    }

    /// Environment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nodes between `\begin` and `\end`.
    pub fn body(&self) -> &[Node] {
        &self.body
    }

    /// Options given to `\begin`.
    pub fn options(&self) -> &[CommandOption] {
        self.begin.options()
    }

    /// The opening command.
    pub fn begin(&self) -> &Command {
        &self.begin
    }

    /// The closing command.
    pub fn end(&self) -> &Command {
        &self.end
    }
}

/// One element of a LaTeX document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Escaped running text
    Text(Text),
    /// A single command
    Command(Command),
    /// An environment wrapping further nodes
    Environment(Environment),
}

impl Node {
    /// Create an escaped text node.
    pub fn text(text: &str) -> Self {
        Node::Text(Text::new(text))
    }

    /// Push this node's lines onto `out`, expanding environments in place.
    pub fn push_lines<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Text(text) => out.push(text.as_str()),
            Node::Command(cmd) => out.push(cmd.as_str()),
            Node::Environment(env) => {
                out.push(env.begin.as_str());
                for node in &env.body {
                    node.push_lines(out);
                }
                out.push(env.end.as_str());
            }
        }
    }

    /// Number of lines this node flattens to.
    pub fn line_count(&self) -> usize {
        match self {
            Node::Text(_) | Node::Command(_) => 1,
            Node::Environment(env) => 2 + env.body.iter().map(Node::line_count).sum::<usize>(),
        }
    }

    /// Check if this node is an environment named `name`.
    pub fn is_environment(&self, name: &str) -> bool {
        matches!(self, Node::Environment(env) if env.name == name)
    }

    /// Check if this node is a command named `name`.
    pub fn is_command(&self, name: &str) -> bool {
        matches!(self, Node::Command(cmd) if cmd.name == name)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Command> for Node {
    fn from(cmd: Command) -> Self {
        Node::Command(cmd)
    }
}

impl From<Environment> for Node {
    fn from(env: Environment) -> Self {
        Node::Environment(env)
    }
}
