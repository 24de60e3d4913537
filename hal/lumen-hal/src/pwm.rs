//! PWM output abstraction

/// Single-channel PWM generator
///
/// Output goes high at the start of each period and low when the counter
/// reaches the compare value, so duty = compare / period.
pub trait PwmOutput {
    /// Error type for PWM operations
    type Error;

    /// Configure timebase and output pin, leaving the output stopped
    fn configure(&mut self, config: &PwmConfig) -> Result<(), Self::Error>;

    /// Update the compare value (takes effect at the next period start)
    fn set_compare(&mut self, ticks: u32) -> Result<(), Self::Error>;

    /// Start the timer
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Stop the timer and release the generator
    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// PWM timebase configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmConfig {
    /// Output GPIO number
    pub pin: u8,
    /// Timer resolution in Hz (ticks per second)
    pub resolution_hz: u32,
    /// Period length in ticks
    pub period_ticks: u32,
}

impl PwmConfig {
    /// Output frequency in Hz
    pub fn frequency_hz(&self) -> u32 {
        if self.period_ticks == 0 {
            0
        } else {
            self.resolution_hz / self.period_ticks
        }
    }
}
