//! Repository for the `forumCategories` collection.

use forum_core::error::CoreError;
use forum_core::ids::next_id;
use forum_core::naming::{category_key, GENERAL_RULES_KEY};
use forum_core::types::{display_now, now_millis, DbId};
use forum_core::validation::validate_category_fields;
use serde_json::Map;

use crate::collection::{read_all, Collection};
use crate::error::DbResult;
use crate::kv::KeyValueStore;
use crate::models::category::{
    Category, CategoryDeletion, CategoryStats, CategoryWithStats, CreateCategory, InitOutcome,
    UpdateCategory,
};
use crate::models::topic::Topic;
use crate::repositories::TopicRepo;
use crate::{CATEGORIES_KEY, TOPICS_KEY};

const ENTITY: &str = "category";

const DEFAULT_NAME: &str = "📋 Общие правила";
const DEFAULT_ICON: &str = "📋";
const DEFAULT_DESCRIPTION: &str = "Правила сервера и важные объявления";

/// The protected default category, with an id that does not collide with
/// anything already in `existing`.
fn general_rules(existing: &[Category]) -> Result<Category, CoreError> {
    Ok(Category {
        id: next_id(now_millis(), existing.iter().map(|c| c.id))?,
        key: GENERAL_RULES_KEY.to_string(),
        name: DEFAULT_NAME.to_string(),
        icon: DEFAULT_ICON.to_string(),
        description: DEFAULT_DESCRIPTION.to_string(),
        created_at: display_now(),
        protected: true,
        extra: Map::new(),
    })
}

/// Provides CRUD operations for categories.
///
/// This is the only writer of the category collection. Deletes also reach
/// into the topic collection to cascade.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories in storage order.
    pub fn list<S: KeyValueStore + ?Sized>(store: &S) -> DbResult<Vec<Category>> {
        Ok(read_all::<_, Category>(store, CATEGORIES_KEY)?)
    }

    /// Find a category by its id.
    pub fn find_by_id<S: KeyValueStore + ?Sized>(
        store: &S,
        id: DbId,
    ) -> DbResult<Option<Category>> {
        Ok(Self::list(store)?.into_iter().find(|c| c.id == id))
    }

    /// Find a category by its key.
    pub fn find_by_key<S: KeyValueStore + ?Sized>(
        store: &S,
        key: &str,
    ) -> DbResult<Option<Category>> {
        Ok(Self::list(store)?.into_iter().find(|c| c.key == key))
    }

    /// Create a new category, returning the stored record.
    ///
    /// The key is derived from the name as given; the stored name, icon and
    /// description are trimmed.
    pub fn create<S: KeyValueStore + ?Sized>(
        store: &S,
        input: &CreateCategory,
    ) -> DbResult<Category> {
        validate_category_fields(&input.name, &input.icon, &input.description)?;

        let mut categories = Collection::<_, Category>::load(store, CATEGORIES_KEY)?;
        let id = next_id(now_millis(), categories.items().iter().map(|c| c.id))?;
        let category = Category {
            id,
            key: category_key(&input.name, id),
            name: input.name.trim().to_string(),
            icon: input.icon.trim().to_string(),
            description: input.description.trim().to_string(),
            created_at: display_now(),
            protected: false,
            extra: Map::new(),
        };

        categories.items_mut().push(category.clone());
        categories.commit()?;

        tracing::info!(id = category.id, key = %category.key, "Category created");
        Ok(category)
    }

    /// Update the editable fields of a category, returning the new record.
    ///
    /// When any field is supplied, the resulting name/icon/description triple
    /// is validated as a whole before anything is written.
    pub fn update<S: KeyValueStore + ?Sized>(
        store: &S,
        id: DbId,
        input: &UpdateCategory,
    ) -> DbResult<Category> {
        let mut categories = Collection::<_, Category>::load(store, CATEGORIES_KEY)?;
        let index = categories
            .items()
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

        if input.touches_fields() {
            let current = &categories.items()[index];
            validate_category_fields(
                input.name.as_deref().unwrap_or(&current.name),
                input.icon.as_deref().unwrap_or(&current.icon),
                input.description.as_deref().unwrap_or(&current.description),
            )?;
        }

        let category = &mut categories.items_mut()[index];
        if let Some(name) = &input.name {
            category.name = name.trim().to_string();
        }
        if let Some(icon) = &input.icon {
            category.icon = icon.trim().to_string();
        }
        if let Some(description) = &input.description {
            category.description = description.trim().to_string();
        }
        let updated = category.clone();

        categories.commit()?;
        tracing::info!(id, key = %updated.key, "Category updated");
        Ok(updated)
    }

    /// Delete a category and, best effort, every topic that references it.
    ///
    /// Protected categories are never removed. Once the category collection
    /// has been written the delete is final: a failure while cleaning up
    /// topics is logged and reported as `topics_removed: None`.
    pub fn delete<S: KeyValueStore + ?Sized>(store: &S, id: DbId) -> DbResult<CategoryDeletion> {
        let mut categories = Collection::<_, Category>::load(store, CATEGORIES_KEY)?;
        let index = categories
            .items()
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

        if categories.items()[index].protected {
            return Err(CoreError::Protected(format!(
                "Category '{}' cannot be deleted",
                categories.items()[index].key
            ))
            .into());
        }

        let category = categories.items_mut().remove(index);
        categories.commit()?;

        let topics_removed = match TopicRepo::delete_by_category(store, &category.key) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = %category.key,
                    "Topic cleanup failed after category delete"
                );
                None
            }
        };

        tracing::info!(id, key = %category.key, ?topics_removed, "Category deleted");
        Ok(CategoryDeletion {
            category,
            topics_removed,
        })
    }

    /// Guarantee the protected `general-rules` category exists.
    ///
    /// Idempotent: repeated calls never duplicate the default and never
    /// remove or reorder other categories.
    pub fn initialize<S: KeyValueStore + ?Sized>(store: &S) -> DbResult<InitOutcome> {
        let mut categories = Collection::<_, Category>::load(store, CATEGORIES_KEY)?;

        if categories
            .items()
            .iter()
            .any(|c| c.key == GENERAL_RULES_KEY)
        {
            return Ok(InitOutcome::AlreadyPresent);
        }

        let default = general_rules(categories.items())?;
        let outcome = if categories.items().is_empty() {
            InitOutcome::Created
        } else {
            InitOutcome::Prepended
        };
        categories.items_mut().insert(0, default);
        categories.commit()?;

        tracing::info!(?outcome, "Default category initialised");
        Ok(outcome)
    }

    /// Topic and reply counts for one category, computed from the current
    /// topic collection.
    pub fn stats<S: KeyValueStore + ?Sized>(
        store: &S,
        category: &Category,
    ) -> DbResult<CategoryStats> {
        let topics: Vec<Topic> = read_all(store, TOPICS_KEY)?;
        Ok(CategoryStats::compute(&topics, &category.key))
    }

    /// All categories in storage order, each with its statistics.
    pub fn list_with_stats<S: KeyValueStore + ?Sized>(
        store: &S,
    ) -> DbResult<Vec<CategoryWithStats>> {
        let categories = Self::list(store)?;
        let topics: Vec<Topic> = read_all(store, TOPICS_KEY)?;
        Ok(categories
            .into_iter()
            .map(|category| {
                let stats = CategoryStats::compute(&topics, &category.key);
                CategoryWithStats { category, stats }
            })
            .collect())
    }
}
