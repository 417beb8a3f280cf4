//! Email and in-app copy for each notification event.

use uuid::Uuid;

use crate::notifier::NotificationEvent;

pub struct Rendered {
    pub subject: String,
    pub body: String,
    pub in_app: String,
    pub email_recipient: Option<String>,
    pub event_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
}

pub fn render(event: &NotificationEvent) -> Rendered {
    match event {
        NotificationEvent::BookingReceived(view) => Rendered {
            subject: format!(
                "Your event \"{}\" booking confirmation",
                view.event.title
            ),
            body: format!(
                "Dear {},\n\n\
                 Your booking for the event titled \"{}\" has been successfully created!\n\
                 Your booking ID is {}. Keep it: you will need it to view or edit your \
                 booking while it is still pending.\n\n\
                 Thank you for reaching out to Playmakers - USTP!\n\n\
                 Best Regards,\nThe Playmakers Family",
                view.booking.organizer_name(),
                view.event.title,
                view.booking.id
            ),
            in_app: format!(
                "New booking \"{}\" submitted by {}.",
                view.event.title,
                view.booking.organizer_name()
            ),
            email_recipient: Some(view.booking.organizer_email.clone()),
            event_id: Some(view.event.id),
            member_id: None,
        },
        NotificationEvent::BookingAccepted { event, booking } => Rendered {
            subject: format!("Your event \"{}\" has been accepted!", event.title),
            body: format!(
                "Dear Organizer,\n\n\
                 Your event \"{}\" has been accepted by Playmakers Admin.\n\
                 For more details, use the Previous Booking lookup with your booking ID.\n\n\
                 Thank you for reaching out to Playmakers - USTP!\n\n\
                 Best Regards,\nThe Playmakers Family",
                event.title
            ),
            in_app: format!("Event \"{}\" was accepted.", event.title),
            email_recipient: Some(booking.organizer_email.clone()),
            event_id: Some(event.id),
            member_id: None,
        },
        NotificationEvent::BookingRejected { event, booking } => Rendered {
            subject: format!("Your event \"{}\" has been rejected", event.title),
            body: format!(
                "Dear Organizer,\n\n\
                 Unfortunately, your event \"{}\" has been rejected by Playmakers Admin. \
                 Please contact us for more details.\n\n\
                 Best regards,\nPlaymakers Admin",
                event.title
            ),
            in_app: format!("Event \"{}\" was rejected.", event.title),
            email_recipient: Some(booking.organizer_email.clone()),
            event_id: Some(event.id),
            member_id: None,
        },
        NotificationEvent::RoleInvite { event, member } => Rendered {
            subject: format!(
                "You are invited to participate in \"{}\"",
                event.title
            ),
            body: format!(
                "Hello {},\n\n\
                 You are invited to participate in the event \"{}\"!\n\
                 For more details, visit Playmakers Hub.\n\n\
                 Best regards,\nThe Playmakers Family",
                member.name, event.title
            ),
            in_app: format!(
                "You are invited to participate in the event \"{}\". \
                 Visit Playmakers Hub for more details.",
                event.title
            ),
            email_recipient: Some(member.email.clone()),
            event_id: Some(event.id),
            member_id: Some(member.id),
        },
        NotificationEvent::MemberJoined { event, member } => Rendered {
            subject: String::new(),
            body: String::new(),
            in_app: format!("{} has joined the event '{}'.", member.name, event.title),
            // In-app only, mirrors the hub activity feed.
            email_recipient: None,
            event_id: Some(event.id),
            member_id: None,
        },
        NotificationEvent::EventFull(event) => Rendered {
            subject: format!("Event \"{}\" has reached full capacity", event.title),
            body: format!(
                "All required musician roles for \"{}\" are now filled. \
                 The event can be published.",
                event.title
            ),
            in_app: format!(
                "The event \"{}\" has reached full capacity.",
                event.title
            ),
            // System notification; admins read it from the in-app log.
            email_recipient: None,
            event_id: Some(event.id),
            member_id: None,
        },
        NotificationEvent::MemberStatusChanged(member) => Rendered {
            subject: "Your Playmakers account status has changed".to_string(),
            body: format!(
                "Hello {},\n\n\
                 This is to inform you that your account status has been updated to {}.\n\
                 If you have questions, please reach out to the Playmakers admins.\n\n\
                 Best regards,\nPlaymakers Admin",
                member.name,
                member.status.as_str()
            ),
            in_app: format!(
                "Account status for {} updated to {}.",
                member.name,
                member.status.as_str()
            ),
            email_recipient: Some(member.email.clone()),
            event_id: None,
            member_id: Some(member.id),
        },
    }
}
