use super::error::{EntityApiErrorKind, Error};
use entity::timetable_entries::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    entry_model: Model,
    created_by: Id,
) -> Result<Model, Error> {
    debug!("New TimetableEntry Model to be inserted: {entry_model:?}");

    let now = chrono::Utc::now();

    let entry_active_model: ActiveModel = ActiveModel {
        course_code: Set(entry_model.course_code.to_uppercase()),
        course_title: Set(entry_model.course_title),
        day_of_week: Set(entry_model.day_of_week),
        start_time: Set(entry_model.start_time),
        end_time: Set(entry_model.end_time),
        venue: Set(entry_model.venue),
        lecturer: Set(entry_model.lecturer),
        department: Set(entry_model.department),
        level: Set(entry_model.level),
        created_by: Set(created_by),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(entry_active_model.save(db).await?.try_into_model()?)
}

pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(entry) => {
            debug!("Existing TimetableEntry model to be Updated: {entry:?}");

            let active_model: ActiveModel = ActiveModel {
                id: Unchanged(entry.id),
                course_code: Set(model.course_code.to_uppercase()),
                course_title: Set(model.course_title),
                day_of_week: Set(model.day_of_week),
                start_time: Set(model.start_time),
                end_time: Set(model.end_time),
                venue: Set(model.venue),
                lecturer: Set(model.lecturer),
                department: Set(model.department),
                level: Set(model.level),
                created_by: Unchanged(entry.created_by),
                created_at: Unchanged(entry.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => {
            debug!("TimetableEntry with id {id} not found");

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
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// All entries in weekly display order: day of week, then start time.
/// Relies on the `day_of_week` database enum being declared Monday..Sunday
/// so that Postgres enum comparison matches calendar order.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_asc(Column::DayOfWeek)
        .order_by_asc(Column::StartTime)
        .all(db)
        .await?)
}
