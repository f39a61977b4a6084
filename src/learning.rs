//! Persisted game records for the `learning` command family.
//!
//! While recording is active every committed move is appended to an
//! in-memory transcript; `save` flushes the transcript to a plain-text
//! file with a timestamp header, and `load` reads one back.

use std::fs;
use std::path::PathBuf;

use chrono::Local;

const DEFAULT_DATA_PATH: &str = "damson_learning.txt";

#[derive(Debug)]
pub struct LearningControl {
    active: bool,
    records: Vec<String>,
    data_path: PathBuf,
}

impl Default for LearningControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningControl {
    pub fn new() -> Self {
        Self {
            active: false,
            records: Vec::new(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin recording from the given position. The starting FEN anchors the
    /// transcript so a record is replayable on its own.
    pub fn start(&mut self, starting_fen: &str) {
        self.active = true;
        self.records.push(format!("position fen {starting_fen}"));
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    /// Record one committed move in coordinate notation.
    pub fn record_move(&mut self, move_text: &str) {
        if self.active {
            self.records.push(format!("move {move_text}"));
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut body = format!("# saved {stamp}\n");
        for record in &self.records {
            body.push_str(record);
            body.push('\n');
        }
        fs::write(&self.data_path, body)
            .map_err(|e| format!("Cannot write {}: {}", self.data_path.display(), e))
    }

    pub fn load(&mut self) -> Result<usize, String> {
        let body = fs::read_to_string(&self.data_path)
            .map_err(|e| format!("Cannot read {}: {}", self.data_path.display(), e))?;
        self.records = body
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect();
        Ok(self.records.len())
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Shutdown hook shared by `quit` and end-of-input: stop recording and
    /// persist whatever was collected.
    pub fn exit(&mut self) {
        self.active = false;
        if !self.records.is_empty() {
            let _ = self.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_are_only_recorded_while_active() {
        let mut learning = LearningControl::new();
        learning.record_move("e2e4");
        assert!(learning.records.is_empty());

        learning.start("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        learning.record_move("e2e4");
        learning.end();
        learning.record_move("e7e5");

        assert_eq!(learning.records.len(), 2);
        assert_eq!(learning.records[1], "move e2e4");
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut learning = LearningControl::new();
        learning.data_path = std::env::temp_dir().join("damson_learning_test.txt");
        learning.start("8/8/8/8/8/8/8/K6k w - - 0 1");
        learning.record_move("a1a2");
        learning.save().unwrap();

        let mut restored = LearningControl::new();
        restored.data_path = learning.data_path.clone();
        let count = restored.load().unwrap();
        assert_eq!(count, 2);
        assert_eq!(restored.records[1], "move a1a2");

        let _ = std::fs::remove_file(&learning.data_path);
    }

    #[test]
    fn clear_empties_the_transcript() {
        let mut learning = LearningControl::new();
        learning.start("8/8/8/8/8/8/8/K6k w - - 0 1");
        learning.record_move("a1a2");
        learning.clear();
        assert!(learning.records.is_empty());
    }
}
