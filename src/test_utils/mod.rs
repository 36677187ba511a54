use std::time::Duration;

use crate::{users::UserId, SessionConfigBuilder};

pub const TEST_COOLDOWN: Duration = Duration::from_millis(50);

/// Config pointed at `base_url` with a cooldown short enough for tests.
pub fn default_builder(base_url: &str) -> SessionConfigBuilder {
    let mut builder = SessionConfigBuilder::default();
    builder
        .base_url(base_url)
        .cooldown(TEST_COOLDOWN)
        .max_user_id(10)
        .skip_current_user(true);
    builder
}

/// A body in the shape the users API returns.
pub fn user_json(id: UserId, name: &str, phone: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "username": name.to_lowercase(),
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": phone,
        "website": "example.com",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    })
}
