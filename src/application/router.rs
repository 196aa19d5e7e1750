/// Bot commands understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Summary,
    Today,
    Week,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Summary => "summary",
            Command::Today => "today",
            Command::Week => "week",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "summary" => Some(Command::Summary),
            "today" => Some(Command::Today),
            "week" => Some(Command::Week),
            _ => None,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.as_str())
    }
}

/// Classification of one inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound<'a> {
    Command(Command),
    UnknownCommand(&'a str),
    /// Free text, handed to the transaction parser untouched.
    Text(&'a str),
}

impl<'a> Inbound<'a> {
    /// Commands start with `/` and may carry a `@botname` suffix and trailing
    /// arguments, which are ignored.
    pub fn parse(text: &'a str) -> Self {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Inbound::Text(text);
        };

        let word = rest.split_whitespace().next().unwrap_or("");
        let name = word.split_once('@').map_or(word, |(name, _)| name);
        match Command::from_str(name) {
            Some(command) => Inbound::Command(command),
            None => Inbound::UnknownCommand(word),
        }
    }
}

/// Reply for messages that do not start with a sign.
pub const USAGE_REPLY: &str = "Use the format: -100 cafe or +500 salary";

/// Reply for messages with a sign but no readable amount.
pub const INVALID_AMOUNT_REPLY: &str = "Amount must be a number, for example: -100 food";

/// Reply when the ledger could not be reached.
pub const STORE_FAILURE_REPLY: &str = "Could not reach the ledger, please try again later";

/// Reply when a report total does not fit an exact decimal.
pub const TOTAL_OVERFLOW_REPLY: &str = "Totals are too large to report";

pub fn help_text() -> String {
    format!(
        "{}\n\
         Commands:\n\
         /summary - balance for all time\n\
         /today - today's report by category\n\
         /week - report for the last 7 days",
        USAGE_REPLY
    )
}
