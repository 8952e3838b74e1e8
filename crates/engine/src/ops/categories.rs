use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, CategoryKind, EngineError, ResultEngine, categories, util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return a category from DB.
    pub async fn category(&self, category_id: i64) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("category {category_id}")))?;
            Category::try_from(model)
        })
    }

    /// All categories, ordered by name.
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let models = categories::Entity::find()
                .order_by_asc(categories::Column::Name)
                .order_by_asc(categories::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Add a category, optionally nested under a folder.
    ///
    /// A parent must exist, be a folder and share the same kind.
    pub async fn new_category(
        &self,
        name: &str,
        kind: CategoryKind,
        parent_id: Option<i64>,
        is_folder: bool,
    ) -> ResultEngine<i64> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            if let Some(parent_id) = parent_id {
                let parent = categories::Entity::find_by_id(parent_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(format!("category {parent_id}")))?;
                let parent = Category::try_from(parent)?;
                if !parent.is_folder {
                    return Err(EngineError::Validation(format!(
                        "category {parent_id} is not a folder"
                    )));
                }
                if parent.kind != kind {
                    return Err(EngineError::Validation(format!(
                        "category {parent_id} is a {} folder",
                        parent.kind.as_str()
                    )));
                }
            }

            let model = categories::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                parent_id: ActiveValue::Set(parent_id),
                is_folder: ActiveValue::Set(is_folder),
            };
            let inserted = model.insert(&db_tx).await?;
            Ok(inserted.id)
        })
    }
}
