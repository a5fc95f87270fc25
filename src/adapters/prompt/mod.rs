mod terminal;

pub use terminal::{ask_yes_no, TerminalConfirm};
