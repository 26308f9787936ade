use std::collections::BTreeMap;

use comms::command::PotAmount;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PotError {
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("{name} has {available} chips, {requested} requested")]
    NotEnoughChips {
        name: String,
        available: i64,
        requested: i64,
    },
    #[error("the pot has {available} chips, {requested} requested")]
    NotEnoughPot { available: i64, requested: i64 },
    #[error("moving {requested} chips would overflow")]
    Overflow { requested: i64 },
}

#[derive(Debug)]
/// [PotLedger] keeps the chips of a room, the shared pot and what every member still holds
///
/// Chips only move between a member record and the pot, so the total never changes
pub struct PotLedger {
    pot: i64,
    record: BTreeMap<String, i64>,
    chips_per_user: i64,
}

impl PotLedger {
    pub fn new(chips_per_user: i64) -> Self {
        PotLedger {
            pot: 0,
            record: BTreeMap::new(),
            chips_per_user,
        }
    }

    pub fn pot(&self) -> i64 {
        self.pot
    }

    pub fn record(&self) -> &BTreeMap<String, i64> {
        &self.record
    }

    /// Gives the default chips to a member seen for the first time, returns true if they were new
    pub fn seat(&mut self, name: &str) -> bool {
        if self.record.contains_key(name) {
            return false;
        }

        self.record.insert(String::from(name), self.chips_per_user);

        true
    }

    /// Moves chips from the member to the pot, returns the new pot
    pub fn bet(&mut self, name: &str, amount: PotAmount) -> Result<i64, PotError> {
        let amount = positive(amount)?;
        let available = self.record.get(name).copied().unwrap_or_default();

        if available < amount {
            return Err(PotError::NotEnoughChips {
                name: String::from(name),
                available,
                requested: amount,
            });
        }

        let pot = self
            .pot
            .checked_add(amount)
            .ok_or(PotError::Overflow { requested: amount })?;

        self.record.insert(String::from(name), available - amount);
        self.pot = pot;

        Ok(self.pot)
    }

    /// Moves chips from the pot back to the member, returns the new pot
    pub fn retrieve(&mut self, name: &str, amount: PotAmount) -> Result<i64, PotError> {
        let amount = positive(amount)?;

        if self.pot < amount {
            return Err(PotError::NotEnoughPot {
                available: self.pot,
                requested: amount,
            });
        }

        let chips = self.record.get(name).copied().unwrap_or_default();
        let chips = chips
            .checked_add(amount)
            .ok_or(PotError::Overflow { requested: amount })?;

        self.record.insert(String::from(name), chips);
        self.pot -= amount;

        Ok(self.pot)
    }
}

fn positive(amount: PotAmount) -> Result<i64, PotError> {
    match amount.as_number() {
        Some(amount) if amount > 0 => Ok(amount),
        _ => Err(PotError::InvalidAmount),
    }
}
