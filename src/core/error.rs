use compact_str::CompactString;

pub type Result<T> = std::result::Result<T, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    Declaration,
    Runtime,
}

impl std::fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationKind::Declaration => f.write_str("declaration"),
            RegistrationKind::Runtime => f.write_str("runtime"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownContextKey {
        key: CompactString,
        expression: CompactString,
    },
    CommandNotFound(CompactString),
    DuplicateRegistration {
        name: CompactString,
        kind: RegistrationKind,
    },
    MissingRuntime(CompactString),
    InvalidWhenClause {
        expression: CompactString,
        message: String,
    },
    Execution {
        name: CompactString,
        message: String,
    },
}

impl CommandError {
    pub fn execution(name: &str, message: impl Into<String>) -> Self {
        CommandError::Execution {
            name: CompactString::from(name),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::UnknownContextKey { key, expression } => write!(
                f,
                "Unknown context key \"{}\" in when clause \"{}\"",
                key, expression
            ),
            CommandError::CommandNotFound(name) => write!(f, "Command not found: {}", name),
            CommandError::DuplicateRegistration { name, kind } => {
                write!(f, "Command {} already registered: {}", kind, name)
            }
            CommandError::MissingRuntime(name) => {
                write!(f, "Cannot execute a command without a runtime: {}", name)
            }
            CommandError::InvalidWhenClause {
                expression,
                message,
            } => write!(f, "Invalid when clause \"{}\": {}", expression, message),
            CommandError::Execution { name, message } => {
                write!(f, "Command {} failed: {}", name, message)
            }
        }
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
#[path = "../../tests/unit/core/error.rs"]
mod tests;
