//! `Fx0A` as a resumable wait.
//!
//! The instruction rewinds the program counter onto itself until a key
//! transition is seen, so every cycle still returns to the host promptly.
//! The first cycle snapshots the keypad; later cycles compare the live keypad
//! against the previous cycle's and resolve on the configured edge.

use super::ChipState;

impl ChipState {
    pub(super) fn wait_for_key(&mut self, x: usize) {
        if !self.awaiting_key {
            self.prev_key_state = self.key_state;
            self.awaiting_key = true;
            self.program_counter -= 2;
            return;
        }

        let edge = self.config.key_wait_edge;
        let key = self
            .prev_key_state
            .iter()
            .zip(self.key_state.iter())
            .position(|(&before, &now)| edge.fires(before, now));

        match key {
            Some(key) => {
                self.registers[x] = key as u8;
                self.awaiting_key = false;
            }
            None => self.program_counter -= 2,
        }
        self.prev_key_state = self.key_state;
    }
}
