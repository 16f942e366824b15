use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::EditError;
use crate::models::figured_bass::{FiguredBass, ItemProperty};

/// Represents a reversible edit of one figured bass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Change one field of one item
    SetItemProperty {
        order: usize,
        value: ItemProperty,
        /// Field value before the edit
        previous: ItemProperty,
    },
    /// Replace the whole content from entered text
    SetText {
        text: String,
        /// Text before the edit (normalized or literal)
        previous: String,
    },
    /// Several commands applied as one step
    Batch {
        commands: Vec<Command>,
    },
}

impl Command {
    /// Execute this command on `fb`
    pub fn execute(&self, fb: &mut FiguredBass) -> Result<(), EditError> {
        match self {
            Command::SetItemProperty { order, value, .. } => {
                fb.set_item_property(*order, *value)?;
                Ok(())
            }
            Command::SetText { text, .. } => {
                // Unparseable text is a valid literal state
                let _ = fb.set_text(text);
                Ok(())
            }
            Command::Batch { commands } => {
                for cmd in commands {
                    cmd.execute(fb)?;
                }
                Ok(())
            }
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, fb: &mut FiguredBass) -> Result<(), EditError> {
        match self {
            Command::SetItemProperty { order, previous, .. } => {
                fb.set_item_property(*order, *previous)?;
                Ok(())
            }
            Command::SetText { previous, .. } => {
                let _ = fb.set_text(previous);
                Ok(())
            }
            Command::Batch { commands } => {
                for cmd in commands.iter().rev() {
                    cmd.undo(fb)?;
                }
                Ok(())
            }
        }
    }
}

/// Bounded undo/redo history for figured bass edits
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoStack {
    commands: VecDeque<Command>,
    /// Position in the stack; commands at and after it can be redone
    current_index: usize,
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoStack {
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record an already executed command. Drops any redo history.
    pub fn push(&mut self, command: Command) {
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        if self.commands.len() > self.max_size {
            self.commands.pop_front();
        }
        self.current_index = self.commands.len();
    }

    /// Set one item field and record the edit
    pub fn set_item_property(
        &mut self,
        fb: &mut FiguredBass,
        order: usize,
        value: ItemProperty,
    ) -> Result<(), EditError> {
        let previous = fb.set_item_property(order, value)?;
        if previous != value {
            self.push(Command::SetItemProperty { order, value, previous });
        }
        Ok(())
    }

    /// Replace the text and record the edit
    pub fn set_text(&mut self, fb: &mut FiguredBass, text: &str) {
        let previous = fb.text().to_string();
        let command = Command::SetText {
            text: text.to_string(),
            previous,
        };
        let _ = fb.set_text(text);
        self.push(command);
    }

    pub fn undo(&mut self, fb: &mut FiguredBass) -> Result<(), EditError> {
        if !self.can_undo() {
            return Err(EditError::NothingToUndo);
        }
        self.commands[self.current_index - 1].undo(fb)?;
        self.current_index -= 1;
        Ok(())
    }

    pub fn redo(&mut self, fb: &mut FiguredBass) -> Result<(), EditError> {
        if !self.can_redo() {
            return Err(EditError::NothingToRedo);
        }
        self.commands[self.current_index].execute(fb)?;
        self.current_index += 1;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
    }

    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    pub fn redo_count(&self) -> usize {
        self.commands.len() - self.current_index
    }
}
