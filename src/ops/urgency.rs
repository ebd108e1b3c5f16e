//! Urgency score, tier, and the color/weight derived from them.
//!
//! Urgency grows linearly with the days since a task was last done, scaled by
//! its frequency. Tiers bucket that score against the total frequency of the
//! current list: tier 0 fades green to yellow, tier 1 fades yellow to red,
//! anything beyond is plain red and gets progressively heavier type.

/// Display color as plain RGB so the engine stays independent of any UI crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// `#RRGGBB`
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Color used when the tier is undefined (empty task set)
pub const NEUTRAL: Rgb = Rgb::new(32, 32, 32);
pub const RED: Rgb = Rgb::new(255, 0, 0);

/// Text emphasis, coarser than the color gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weight {
    Normal,
    DemiBold,
    Bold,
    ExtraBold,
}

/// Urgency math for one pass over the current list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencyCalculator {
    total_frequency: i64,
    todos_per_day: i64,
    /// Step along the curve per urgency point
    delta: f64,
}

impl UrgencyCalculator {
    pub fn new(total_frequency: u64, todos_per_day: u32) -> Self {
        let total = i64::try_from(total_frequency).unwrap_or(i64::MAX);
        let divisor = if total == 0 { 1 } else { total };
        UrgencyCalculator {
            total_frequency: total,
            todos_per_day: i64::from(todos_per_day),
            delta: 2.0 / divisor as f64,
        }
    }

    pub fn total_frequency(&self) -> i64 {
        self.total_frequency
    }

    pub fn todos_per_day(&self) -> i64 {
        self.todos_per_day
    }

    /// Urgency of a task not done for `days_since_done` days
    pub fn urgency(&self, days_since_done: i64, frequency: u32) -> i64 {
        urgency(days_since_done, frequency, self.todos_per_day)
    }

    /// Urgency bucket; -1 when there is nothing to compare against
    pub fn tier(&self, urgency: i64) -> i64 {
        if self.total_frequency == 0 {
            return -1;
        }
        (urgency - 1) / self.total_frequency
    }

    /// One color channel along a parabola that peaks mid-tier.
    ///
    /// The second tier folds back onto the first tier's curve, so the green
    /// channel falls along the same shape the red channel rose on.
    pub fn interpolated_color_value(&self, urgency: i64) -> u8 {
        if urgency <= 0 {
            return 0;
        }

        let mut urgency = urgency;
        if urgency > self.total_frequency {
            urgency = 2 * self.total_frequency - urgency + 2;
        }

        // -(x-3)^2 + 9 over x in [0, 2]
        let t = (urgency - 1) as f64 * self.delta - 3.0;
        let value = 255.0 * (9.0 - t * t) / 8.0;
        value.clamp(0.0, 255.0) as u8
    }

    pub fn color(&self, urgency: i64) -> Rgb {
        match self.tier(urgency) {
            -1 => NEUTRAL,
            0 => Rgb::new(self.interpolated_color_value(urgency), 255, 0),
            1 => Rgb::new(255, self.interpolated_color_value(urgency), 0),
            _ => RED,
        }
    }

    pub fn weight(&self, urgency: i64) -> Weight {
        weight_for_tier(self.tier(urgency))
    }
}

/// `days * frequency * todos_per_day`
pub fn urgency(days_since_done: i64, frequency: u32, todos_per_day: i64) -> i64 {
    days_since_done * i64::from(frequency) * todos_per_day
}

pub fn weight_for_tier(tier: i64) -> Weight {
    match tier {
        t if t < 3 => Weight::Normal,
        3 => Weight::DemiBold,
        4 => Weight::Bold,
        _ => Weight::ExtraBold,
    }
}

/// Number of fire markers shown in front of a long-overdue task
pub fn fires_for_tier(tier: i64) -> usize {
    usize::try_from(tier - 1).unwrap_or(0)
}
