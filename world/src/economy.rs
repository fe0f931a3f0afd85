//! Lives, currency and wave progress shared across the run.

use wave_defence_core::{PurchaseError, Stats};

use crate::config::EconomyConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    lives: u32,
    currency: u32,
    wave: u32,
    max_waves: u32,
    wave_in_progress: bool,
}

impl Economy {
    pub(crate) fn new(config: EconomyConfig, max_waves: u32) -> Self {
        Self {
            lives: config.starting_lives,
            currency: config.starting_currency,
            wave: 0,
            max_waves,
            wave_in_progress: false,
        }
    }

    pub(crate) fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) fn wave(&self) -> u32 {
        self.wave
    }

    pub(crate) fn wave_in_progress(&self) -> bool {
        self.wave_in_progress
    }

    /// Reports whether another wave may start right now.
    pub(crate) fn can_start_wave(&self) -> bool {
        !self.wave_in_progress && self.wave < self.max_waves
    }

    /// Advances to the next wave, returning its one-based index.
    pub(crate) fn begin_wave(&mut self) -> u32 {
        self.wave += 1;
        self.wave_in_progress = true;
        self.wave
    }

    pub(crate) fn finish_wave(&mut self) {
        self.wave_in_progress = false;
    }

    pub(crate) fn is_final_wave(&self) -> bool {
        self.wave >= self.max_waves
    }

    /// Removes one life, saturating at zero. Returns the lives left.
    pub(crate) fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub(crate) fn earn(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Deducts `amount`, or rejects the purchase leaving funds untouched.
    pub(crate) fn spend(&mut self, amount: u32) -> Result<(), PurchaseError> {
        self.currency = self
            .currency
            .checked_sub(amount)
            .ok_or(PurchaseError::InsufficientFunds)?;
        Ok(())
    }

    pub(crate) fn stats(&self) -> Stats {
        Stats {
            lives: self.lives,
            currency: self.currency,
            wave: self.wave,
            max_waves: self.max_waves,
            wave_in_progress: self.wave_in_progress,
        }
    }
}
