use thiserror::Error;

/// Every rule a request body broke, in the order the rules were checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

/// Collects failed rules and turns them into a `Result` at the end.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    messages: Vec<String>,
}

impl Checker {
    pub(crate) fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.messages.push(message.to_string());
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(std::mem::take(&mut self.messages)))
        }
    }
}
