//! Backlight trait

/// Raw duty-cycle backlight actuator
pub trait Backlight {
    /// Actuator error
    type Error;

    /// Configure and start the output at its default duty
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Set duty in percent (0-100)
    ///
    /// Values above 100 are clamped. Implementations floor the duty at a
    /// non-zero minimum so the panel never goes fully dark.
    fn set_duty(&mut self, percent: u8) -> Result<(), Self::Error>;

    /// Last requested duty in percent
    fn duty(&self) -> u8;

    /// Stop the output and release it
    fn shutdown(&mut self) -> Result<(), Self::Error>;
}
