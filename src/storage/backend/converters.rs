use crate::storage::{Hit, Link, User};
use migration::entities::{hit, link, user};

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        avatar_url: model.avatar_url,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        url: model.url,
        alias: model.alias,
        owner_id: model.owner_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_hit(model: hit::Model) -> Hit {
    Hit {
        id: model.id,
        link_id: model.link_id,
        created_at: model.created_at,
    }
}
