use math_objects::{MathContent, PartSlot};

/// Commands that turn into a math object when followed by a space, `^` or `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathCommand {
    Sum,
    Integral,
    System,
    SquareRoot,
}

impl MathCommand {
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "\\sum" => Some(MathCommand::Sum),
            "\\int" => Some(MathCommand::Integral),
            "\\sys" => Some(MathCommand::System),
            "\\sqrt" => Some(MathCommand::SquareRoot),
            _ => None,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            MathCommand::Sum => "\\sum",
            MathCommand::Integral => "\\int",
            MathCommand::System => "\\sys",
            MathCommand::SquareRoot => "\\sqrt",
        }
    }

    pub fn content(&self) -> MathContent {
        match self {
            MathCommand::Sum => MathContent::summation(),
            MathCommand::Integral => MathContent::integral(),
            MathCommand::System => MathContent::system_of_equations(),
            MathCommand::SquareRoot => MathContent::square_root(),
        }
    }

    /// The part that receives the next keystrokes
    pub fn initial_part(&self, trigger: char) -> PartSlot {
        match (self, trigger) {
            (MathCommand::System | MathCommand::SquareRoot, _) => PartSlot::First,
            (_, '^') => PartSlot::First,
            (_, '_') => PartSlot::Second,
            _ => PartSlot::Third,
        }
    }
}

pub fn is_command_trigger(value: char) -> bool {
    matches!(value, ' ' | '^' | '_')
}

/// Remembers the digits or the `\command` that was typed right before the caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerCollector {
    number: String,
    command: String,
    /// The caret offset right after the collected run
    end: Option<i64>,
}

impl TriggerCollector {
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn clear(&mut self) {
        self.number.clear();
        self.command.clear();
        self.end = None;
    }

    /// The run only counts while the caret stays where it ended.
    pub fn sync(&mut self, caret: i64) {
        if self.end != Some(caret) {
            self.clear();
        }
    }

    /// Records a character that the host inserts at `offset`.
    pub fn push(&mut self, offset: i64, value: char) {
        if value.is_ascii_digit() {
            self.number.push(value);
            self.command.clear();
        } else if value == '\\' || !self.command.is_empty() {
            self.command.push(value);
            self.number.clear();
        } else {
            self.clear();
            return;
        }
        self.end = Some(offset + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_runs() {
        let mut triggers = TriggerCollector::default();
        triggers.push(0, '1');
        triggers.push(1, '2');
        assert_eq!(triggers.number(), "12");

        triggers.push(2, '\\');
        triggers.push(3, 's');
        assert_eq!(triggers.number(), "");
        assert_eq!(triggers.command(), "\\s");

        triggers.push(4, '+');
        assert_eq!(triggers.command(), "\\s+");

        triggers.sync(5);
        assert_eq!(triggers.command(), "\\s+");
        triggers.sync(2);
        assert_eq!(triggers.command(), "");
    }

    #[test]
    fn test_other_characters_clear() {
        let mut triggers = TriggerCollector::default();
        triggers.push(0, '4');
        triggers.push(1, 'a');
        assert_eq!(triggers.number(), "");
    }

    #[test]
    fn test_initial_part() {
        assert_eq!(MathCommand::Sum.initial_part('^'), PartSlot::First);
        assert_eq!(MathCommand::Integral.initial_part('_'), PartSlot::Second);
        assert_eq!(MathCommand::Sum.initial_part(' '), PartSlot::Third);
        assert_eq!(MathCommand::System.initial_part(' '), PartSlot::First);
        assert_eq!(MathCommand::SquareRoot.initial_part('_'), PartSlot::First);
    }
}
