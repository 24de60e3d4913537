//! PWM backlight
//!
//! Maps a 0-100% duty request to a compare value on a single PWM channel.
//! The compare value never drops below a configured floor, so even 0%
//! leaves the panel faintly lit.

use lumen_core::config::board;
use lumen_core::traits::Backlight;
use lumen_hal::pwm::{PwmConfig, PwmOutput};

/// PWM backlight configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmBacklightConfig {
    /// Timebase and output pin
    pub pwm: PwmConfig,
    /// Lowest compare value ever written
    pub min_compare: u32,
    /// Duty applied by `init`
    pub default_percent: u8,
}

impl Default for PwmBacklightConfig {
    fn default() -> Self {
        Self {
            pwm: PwmConfig {
                pin: board::PIN_BACKLIGHT,
                resolution_hz: board::BACKLIGHT_RESOLUTION_HZ,
                period_ticks: board::BACKLIGHT_PERIOD_TICKS,
            },
            min_compare: board::BACKLIGHT_MIN_COMPARE,
            default_percent: board::BACKLIGHT_DEFAULT_PERCENT,
        }
    }
}

impl PwmBacklightConfig {
    /// Compare value for a duty request
    ///
    /// `period × percent / 100`, floored at `min_compare`. Percent above
    /// 100 is clamped.
    pub fn compare_for(&self, percent: u8) -> u32 {
        let percent = percent.min(100) as u64;
        let ticks = (self.pwm.period_ticks as u64 * percent / 100) as u32;
        ticks.max(self.min_compare)
    }
}

/// Errors that can occur with the backlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightError<E> {
    /// Output not started
    NotInitialized,
    /// PWM peripheral error
    Pwm(E),
}

/// Backlight on a PWM channel
pub struct PwmBacklight<P: PwmOutput> {
    pwm: P,
    config: PwmBacklightConfig,
    percent: u8,
    running: bool,
}

impl<P: PwmOutput> PwmBacklight<P> {
    /// Create a stopped backlight
    pub fn new(pwm: P, config: PwmBacklightConfig) -> Self {
        Self {
            pwm,
            config,
            percent: 0,
            running: false,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &PwmBacklightConfig {
        &self.config
    }

    /// Check if the output is running
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl<P: PwmOutput> Backlight for PwmBacklight<P> {
    type Error = BacklightError<P::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        let percent = self.config.default_percent.min(100);
        self.pwm
            .configure(&self.config.pwm)
            .map_err(BacklightError::Pwm)?;
        self.pwm
            .set_compare(self.config.compare_for(percent))
            .map_err(BacklightError::Pwm)?;
        self.pwm.start().map_err(BacklightError::Pwm)?;

        self.percent = percent;
        self.running = true;
        info!(
            "Backlight on pin {} at {}% ({} Hz)",
            self.config.pwm.pin,
            percent,
            self.config.pwm.frequency_hz()
        );
        Ok(())
    }

    fn set_duty(&mut self, percent: u8) -> Result<(), Self::Error> {
        if !self.running {
            return Err(BacklightError::NotInitialized);
        }
        let percent = percent.min(100);
        self.pwm
            .set_compare(self.config.compare_for(percent))
            .map_err(BacklightError::Pwm)?;
        self.percent = percent;
        Ok(())
    }

    fn duty(&self) -> u8 {
        self.percent
    }

    fn shutdown(&mut self) -> Result<(), Self::Error> {
        if !self.running {
            return Err(BacklightError::NotInitialized);
        }
        self.running = false;
        self.pwm.stop().map_err(BacklightError::Pwm)
    }
}
