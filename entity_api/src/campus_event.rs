use super::error::{EntityApiErrorKind, Error};
use entity::campus_events::{ActiveModel, Column, Entity, Model};
use entity::{users, Id};
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    event_model: Model,
    organizer_id: Id,
) -> Result<Model, Error> {
    debug!("New CampusEvent Model to be inserted: {event_model:?}");

    let now = chrono::Utc::now();

    let event_active_model: ActiveModel = ActiveModel {
        title: Set(event_model.title),
        description: Set(event_model.description),
        start_date: Set(event_model.start_date),
        end_date: Set(event_model.end_date),
        venue: Set(event_model.venue),
        organizer_id: Set(organizer_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let event = event_active_model.save(db).await?.try_into_model()?;

    with_organizer(db, event).await
}

pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(event) => {
            debug!("Existing CampusEvent model to be Updated: {event:?}");

            let active_model: ActiveModel = ActiveModel {
                id: Unchanged(event.id),
                title: Set(model.title),
                description: Set(model.description),
                start_date: Set(model.start_date),
                end_date: Set(model.end_date),
                venue: Set(model.venue),
                organizer_id: Unchanged(event.organizer_id),
                created_at: Unchanged(event.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            let updated = active_model.update(db).await?.try_into_model()?;

            with_organizer(db, updated).await
        }
        None => {
            debug!("CampusEvent with id {id} not found");

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = find_by_id(db, id).await?;

    result.delete(db).await?;
    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let event = Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })?;

    with_organizer(db, event).await
}

/// All events ordered by start date, soonest first. This is the collection's
/// natural ordering key, mirrored client-side.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    let results = Entity::find()
        .find_also_related(users::Entity)
        .order_by_asc(Column::StartDate)
        .all(db)
        .await?;

    Ok(results
        .into_iter()
        .map(|(mut event, organizer)| {
            event.organizer_name = organizer.map(|o| o.name);
            event
        })
        .collect())
}

async fn with_organizer(db: &DatabaseConnection, mut event: Model) -> Result<Model, Error> {
    let organizer = users::Entity::find_by_id(event.organizer_id).one(db).await?;

    event.organizer_name = organizer.map(|o| o.name);
    Ok(event)
}
