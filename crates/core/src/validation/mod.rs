//! Booking-rule validation

pub mod business_hours;

pub use business_hours::BusinessHoursValidator;
