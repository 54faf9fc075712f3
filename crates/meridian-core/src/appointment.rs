//! Consultation bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  ValidationError,
  status::AppointmentStatus,
  validate::{Fields, Validate},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
  pub id:             Uuid,
  pub name:           String,
  pub email:          String,
  pub phone:          Option<String>,
  pub preferred_date: DateTime<Utc>,
  pub preferred_time: String,
  pub service_type:   String,
  pub message:        Option<String>,
  pub status:         AppointmentStatus,
  pub created_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
  pub name:           String,
  pub email:          String,
  pub phone:          Option<String>,
  pub preferred_date: DateTime<Utc>,
  pub preferred_time: String,
  pub service_type:   String,
  pub message:        Option<String>,
}

impl Validate for NewAppointment {
  fn validate(raw: &Value) -> Result<Self, ValidationError> {
    let f = Fields::new(raw)?;
    Ok(Self {
      name:           f.required_str("name")?,
      email:          f.required_email("email")?,
      phone:          f.optional_str("phone")?,
      preferred_date: f.required_instant("preferredDate")?,
      preferred_time: f.required_str("preferredTime")?,
      service_type:   f.required_str("serviceType")?,
      message:        f.optional_str("message")?,
    })
  }
}
