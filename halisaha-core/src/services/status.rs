//! Status service - booking and directory summary

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ReservationStatus;

use super::directory::UserDirectory;
use super::reservation::ReservationService;

#[derive(Debug, Default)]
pub struct StatusService;

impl StatusService {
    pub fn new() -> Self {
        Self
    }

    pub fn get_status(
        &self,
        reservations: &ReservationService,
        users: &UserDirectory,
    ) -> StatusSummary {
        let by_status = ReservationStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                label: status.label(),
                count: reservations.iter().filter(|(_, r)| r.status == *status).count() as i64,
            })
            .collect();

        let dates: Vec<NaiveDate> = reservations.iter().map(|(_, r)| r.date).collect();
        let date_range = DateRange {
            earliest: dates.iter().min().map(|d| d.to_string()),
            latest: dates.iter().max().map(|d| d.to_string()),
        };

        StatusSummary {
            total_users: users.list().len() as i64,
            total_reservations: reservations.len() as i64,
            by_status,
            date_range,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_users: i64,
    pub total_reservations: i64,
    pub by_status: Vec<StatusCount>,
    pub date_range: DateRange,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: ReservationStatus,
    pub label: &'static str,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}
