//! Repository for the `forumTopics` collection.
//!
//! Replies are nested inside their topic, so adding a reply rewrites the
//! topic array.

use forum_core::error::CoreError;
use forum_core::ids::next_id;
use forum_core::roles::can_reply;
use forum_core::types::{display_now, now_millis, DbId};
use forum_core::validation::require_non_blank;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::collection::{read_all, Collection};
use crate::error::{DbResult, StoreError};
use crate::kv::KeyValueStore;
use crate::models::topic::{CreateTopic, Reply, Topic};
use crate::models::user::User;
use crate::repositories::CategoryRepo;
use crate::TOPICS_KEY;

const ENTITY: &str = "topic";

pub const MSG_BLANK_TITLE: &str = "Заголовок темы не может быть пустым";
pub const MSG_BLANK_MESSAGE: &str = "Сообщение не может быть пустым";
pub const MSG_REPLY_FORBIDDEN: &str = "Только администраторы и основатель могут отвечать на темы";

/// Load the topic array for writing.
///
/// Elements are kept as raw JSON so a write leaves every topic it does not
/// target exactly as stored. Each element must still parse as a [`Topic`];
/// the parsed copies are returned index-aligned with the raw ones.
fn load_for_write<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<(Collection<'_, S, Value>, Vec<Topic>), StoreError> {
    let raw = Collection::<_, Value>::load(store, TOPICS_KEY)?;
    let parsed = raw
        .items()
        .iter()
        .map(|value| Topic::deserialize(value))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| StoreError::Corrupt {
            key: TOPICS_KEY.to_string(),
            source,
        })?;
    Ok((raw, parsed))
}

/// Provides CRUD operations for topics and their replies.
pub struct TopicRepo;

impl TopicRepo {
    /// List all topics in storage order.
    pub fn list<S: KeyValueStore + ?Sized>(store: &S) -> DbResult<Vec<Topic>> {
        Ok(read_all::<_, Topic>(store, TOPICS_KEY)?)
    }

    /// List the topics of one category, in storage order.
    pub fn list_by_category<S: KeyValueStore + ?Sized>(
        store: &S,
        category_key: &str,
    ) -> DbResult<Vec<Topic>> {
        let mut topics = Self::list(store)?;
        topics.retain(|t| t.category == category_key);
        Ok(topics)
    }

    /// Find a topic by its id.
    pub fn find_by_id<S: KeyValueStore + ?Sized>(store: &S, id: DbId) -> DbResult<Option<Topic>> {
        Ok(Self::list(store)?.into_iter().find(|t| t.id == id))
    }

    /// Create a topic in an existing category. Any role may create topics.
    pub fn create<S: KeyValueStore + ?Sized>(
        store: &S,
        author: &User,
        input: &CreateTopic,
    ) -> DbResult<Topic> {
        require_non_blank(&input.title, MSG_BLANK_TITLE)?;
        require_non_blank(&input.message, MSG_BLANK_MESSAGE)?;
        if CategoryRepo::find_by_key(store, &input.category)?.is_none() {
            return Err(CoreError::not_found_key("category", &input.category).into());
        }

        let (mut raw, parsed) = load_for_write(store)?;
        let topic = Topic {
            id: next_id(now_millis(), parsed.iter().map(|t| t.id))?,
            category: input.category.clone(),
            title: input.title.trim().to_string(),
            author: author.nickname.clone(),
            author_role: Some(author.role),
            message: input.message.clone(),
            date: display_now(),
            replies: Some(Vec::new()),
            extra: Map::new(),
        };
        raw.items_mut()
            .push(serde_json::to_value(&topic).map_err(StoreError::from)?);
        raw.commit()?;

        tracing::info!(id = topic.id, category = %topic.category, "Topic created");
        Ok(topic)
    }

    /// Append a reply to a topic. Only founders and admins may reply.
    pub fn add_reply<S: KeyValueStore + ?Sized>(
        store: &S,
        author: &User,
        topic_id: DbId,
        message: &str,
    ) -> DbResult<Topic> {
        if !can_reply(author.role) {
            return Err(CoreError::Forbidden(MSG_REPLY_FORBIDDEN.to_string()).into());
        }
        require_non_blank(message, MSG_BLANK_MESSAGE)?;

        let (mut raw, mut parsed) = load_for_write(store)?;
        let index = parsed
            .iter()
            .position(|t| t.id == topic_id)
            .ok_or_else(|| CoreError::not_found(ENTITY, topic_id))?;

        let mut updated = parsed.swap_remove(index);
        updated.replies.get_or_insert_with(Vec::new).push(Reply {
            author: author.nickname.clone(),
            author_role: Some(author.role),
            message: message.to_string(),
            date: display_now(),
            extra: Map::new(),
        });
        raw.items_mut()[index] = serde_json::to_value(&updated).map_err(StoreError::from)?;
        raw.commit()?;

        tracing::info!(id = topic_id, replies = updated.reply_count(), "Reply added");
        Ok(updated)
    }

    /// Remove every topic referencing `category_key`, returning how many
    /// were removed.
    ///
    /// An absent topic collection has nothing to remove and is left absent.
    /// Nothing is written when no topic matches. Surviving topics are
    /// written back exactly as stored.
    pub fn delete_by_category<S: KeyValueStore + ?Sized>(
        store: &S,
        category_key: &str,
    ) -> DbResult<usize> {
        let (mut raw, _) = load_for_write(store)?;
        if !raw.existed() {
            return Ok(0);
        }

        let before = raw.items().len();
        raw.items_mut()
            .retain(|t| t.get("category").and_then(Value::as_str) != Some(category_key));
        let removed = before - raw.items().len();
        if removed > 0 {
            raw.commit()?;
        }
        Ok(removed)
    }
}
