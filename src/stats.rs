//! Health management
//!
//! Health is an integer pool clamped to `[0, max]`. Damage and healing go
//! through methods that report what actually happened, so callers can react to
//! fatal hits without re-deriving them.
//!
//! # Example
//!
//! ```ignore
//! let mut health = Health::new(5);
//! let result = health.take_damage(2);
//! assert_eq!(result.damage_dealt, 2);
//! assert_eq!(health.current(), 3);
//! ```

/// Represents a character's health points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Creates a new Health instance with full health
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Health { current: max, max }
    }

    /// Health with an explicit current value, clamped into range
    pub fn with_current(current: i32, max: i32) -> Self {
        let max = max.max(0);
        Health {
            current: current.clamp(0, max),
            max,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Returns health as a percentage (0.0 to 1.0)
    pub fn percentage(&self) -> f32 {
        if self.max <= 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Applies damage to health
    ///
    /// Negative amounts are treated as zero; healing goes through [`heal`](Self::heal).
    ///
    /// ```ignore
    /// let mut health = Health::new(3);
    /// let result = health.take_damage(5);
    /// assert_eq!(result.damage_dealt, 3);
    /// assert!(result.is_fatal);
    /// assert_eq!(result.overkill, 2);
    /// ```
    pub fn take_damage(&mut self, amount: i32) -> DamageResult {
        let amount = amount.max(0);
        let old_health = self.current;
        self.current = (self.current - amount).max(0);

        DamageResult {
            damage_dealt: old_health - self.current,
            is_fatal: self.current == 0,
            overkill: (amount - old_health).max(0),
        }
    }

    /// Heals health, capped at max health. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old_health = self.current;
        self.current = (self.current + amount.max(0)).min(self.max);
        self.current - old_health
    }
}

/// Outcome of a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    pub damage_dealt: i32,
    pub is_fatal: bool,
    pub overkill: i32,
}
