use crate::campus_events::Model;
use crate::error::Error;
use crate::{require_owner_or_admin, require_staff, Id};
use entity::users::Model as User;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::campus_event::{find_all, find_by_id};

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    model: Model,
    user: &User,
) -> Result<Model, Error> {
    require_staff(user)?;

    let event = entity_api::campus_event::create(db, model, user.id).await?;

    publisher
        .publish(DomainEvent::CampusEventCreated {
            event: serde_json::to_value(&event)?,
        })
        .await;

    Ok(event)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    model: Model,
    user: &User,
) -> Result<Model, Error> {
    require_staff(user)?;

    let existing = entity_api::campus_event::find_by_id(db, id).await?;
    require_owner_or_admin(user, existing.organizer_id)?;

    let event = entity_api::campus_event::update(db, id, model).await?;

    publisher
        .publish(DomainEvent::CampusEventUpdated {
            event: serde_json::to_value(&event)?,
        })
        .await;

    Ok(event)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    user: &User,
) -> Result<(), Error> {
    require_staff(user)?;

    let existing = entity_api::campus_event::find_by_id(db, id).await?;
    require_owner_or_admin(user, existing.organizer_id)?;

    entity_api::campus_event::delete_by_id(db, id).await?;

    debug!("CampusEvent {id} deleted, publishing broadcast");

    publisher
        .publish(DomainEvent::CampusEventDeleted { event_id: id })
        .await;

    Ok(())
}
