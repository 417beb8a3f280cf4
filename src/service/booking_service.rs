use std::sync::Arc;
use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{BookingPatch, BookingView, EventStatus, NewBooking, RoleCounts},
    error::{AppError, Result},
    notifier::{Dispatcher, NotificationEvent},
    repository::BookingRepository,
};

/// Intake and maintenance of booking requests. A booking and its event
/// are created together in one transaction; either both exist or neither
/// does.
pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    dispatcher: Arc<Dispatcher>,
}

impl BookingService {
    pub fn new(booking_repo: Arc<dyn BookingRepository>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            booking_repo,
            dispatcher,
        }
    }

    pub async fn create_booking(&self, new_booking: NewBooking) -> Result<BookingView> {
        new_booking
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        check_dates(new_booking.start_date, new_booking.end_date)?;
        check_genre_theme(&new_booking.genre, &new_booking.theme)?;
        check_roles(&new_booking.roles)?;

        let view = self.booking_repo.create(new_booking).await?;

        self.dispatcher
            .dispatch(NotificationEvent::BookingReceived(view.clone()))
            .await;

        Ok(view)
    }

    /// Organizers may revise a booking only while the event is still
    /// Pending. Once an admin has ruled on it the request is frozen.
    pub async fn edit_booking(&self, booking_id: Uuid, patch: BookingPatch) -> Result<BookingView> {
        patch
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        check_dates(patch.start_date, patch.end_date)?;
        check_genre_theme(&patch.genre, &patch.theme)?;
        check_roles(&patch.roles)?;

        let view = self
            .booking_repo
            .find_view(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if view.event.status != EventStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Booking can no longer be edited once the event is {}",
                view.event.status
            )));
        }

        self.booking_repo.update(booking_id, patch).await
    }

    pub async fn lookup_booking(&self, booking_id: Uuid) -> Result<BookingView> {
        self.booking_repo
            .find_view(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(AppError::Validation(
            "End date must not be before the start date".to_string(),
        ));
    }
    Ok(())
}

fn check_genre_theme(genre: &Option<String>, theme: &Option<String>) -> Result<()> {
    let has_genre = genre.as_deref().is_some_and(|g| !g.trim().is_empty());
    let has_theme = theme.as_deref().is_some_and(|t| !t.trim().is_empty());

    match (has_genre, has_theme) {
        (true, false) | (false, true) => Ok(()),
        (true, true) => Err(AppError::Validation(
            "Provide either a genre or a theme, not both".to_string(),
        )),
        (false, false) => Err(AppError::Validation(
            "A genre or a theme is required".to_string(),
        )),
    }
}

fn check_roles(roles: &RoleCounts) -> Result<()> {
    for role in crate::domain::MusicianRole::ALL {
        if roles.get(role) < 0 {
            return Err(AppError::Validation(format!(
                "Requested count for {} must not be negative",
                role
            )));
        }
    }
    Ok(())
}
