use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    #[error("Sensor has no sample ready")]
    NotReady,
    #[error("Sensor fault: {0}")]
    Fault(String),
}

/// Source of raw integer samples.
pub trait Sensor {
    fn read(&mut self) -> Result<i32, SensorError>;
}

impl<F> Sensor for F
where
    F: FnMut() -> Result<i32, SensorError>,
{
    fn read(&mut self) -> Result<i32, SensorError> {
        self()
    }
}
