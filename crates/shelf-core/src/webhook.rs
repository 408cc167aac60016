//! Inbound inventory-update events.
//!
//! Signature verification happens in the HTTP layer over the raw body; this
//! module only parses an already-authenticated payload and applies it.

use rust_decimal::Decimal;
use serde::{Deserialize, de::Error as _};
use serde_json::Value;

use crate::{
  Error, Result,
  product::{NewProduct, ProductUpdate},
  store::ProductStore,
  sync::Reconciled,
};

/// Title given to products first seen through a webhook without one.
pub const UNKNOWN_PRODUCT_TITLE: &str = "Unknown Product";

/// A single inventory change reported by the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEvent {
  pub external_id: String,
  pub inventory:   i64,
  /// Blank titles are treated as absent.
  pub title:       Option<String>,
}

/// Upstream ids arrive as JSON numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
  Number(u64),
  Text(String),
}

#[derive(Deserialize)]
struct RawInventoryEvent {
  id:                 RawId,
  inventory_quantity: i64,
  #[serde(default)]
  title:              Option<String>,
}

impl InventoryEvent {
  /// Parse a webhook body: `{"id": ..., "inventory_quantity": n, "title"?: ...}`.
  /// The body must be a JSON object; unknown fields are ignored.
  pub fn from_json(body: &[u8]) -> Result<Self> {
    // A derived struct visitor also accepts `[id, quantity]`.
    let object = match serde_json::from_slice::<Value>(body)? {
      Value::Object(map) => map,
      _ => return Err(serde_json::Error::custom("expected a JSON object").into()),
    };
    let raw: RawInventoryEvent = serde_json::from_value(Value::Object(object))?;
    let external_id = match raw.id {
      RawId::Number(n) => n.to_string(),
      RawId::Text(s) => s,
    };
    Ok(Self {
      external_id,
      inventory: raw.inventory_quantity,
      title: raw.title.filter(|t| !t.trim().is_empty()),
    })
  }
}

/// Apply an event: update the known product's inventory (recording the
/// delta) and title, or create a placeholder product priced at zero until
/// the next full sync corrects it.
pub async fn apply_inventory_event<S: ProductStore>(
  store: &S,
  event: InventoryEvent,
) -> Result<Reconciled> {
  let existing = store
    .get_product_by_external_id(&event.external_id)
    .await
    .map_err(Error::store)?;

  match existing {
    Some(current) => {
      let update = ProductUpdate {
        title: event.title,
        ..ProductUpdate::inventory_delta(current.inventory, event.inventory)?
      };
      store
        .update_product(current.id, update)
        .await
        .map_err(Error::store)?
        .map(Reconciled::Updated)
        .ok_or(Error::ProductVanished(current.id))
    }
    None => {
      let input = NewProduct {
        external_id: event.external_id,
        title:       event
          .title
          .unwrap_or_else(|| UNKNOWN_PRODUCT_TITLE.to_owned()),
        inventory:   event.inventory,
        price:       Decimal::ZERO,
      };
      let created = store
        .create_product(input, event.inventory)
        .await
        .map_err(Error::store)?;
      Ok(Reconciled::Created(created))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_numeric_id() {
    let e = InventoryEvent::from_json(br#"{"id":840080123456,"inventory_quantity":7}"#).unwrap();
    assert_eq!(e.external_id, "840080123456");
    assert_eq!(e.inventory, 7);
    assert_eq!(e.title, None);
  }

  #[test]
  fn parses_string_id_and_title() {
    let e = InventoryEvent::from_json(
      br#"{"id":"A","inventory_quantity":20,"title":"Lamp","vendor":"x"}"#,
    )
    .unwrap();
    assert_eq!(e.external_id, "A");
    assert_eq!(e.title.as_deref(), Some("Lamp"));
  }

  #[test]
  fn blank_title_is_absent() {
    let e = InventoryEvent::from_json(br#"{"id":"A","inventory_quantity":1,"title":"  "}"#).unwrap();
    assert_eq!(e.title, None);
  }

  #[test]
  fn missing_quantity_is_rejected() {
    let err = InventoryEvent::from_json(br#"{"id":"A"}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidEvent(_)));
  }

  #[test]
  fn non_object_is_rejected() {
    assert!(InventoryEvent::from_json(b"not json").is_err());
    assert!(InventoryEvent::from_json(b"[1,2]").is_err());
    assert!(matches!(
      InventoryEvent::from_json(br#"["ARR", 5]"#),
      Err(Error::InvalidEvent(_))
    ));
    assert!(InventoryEvent::from_json(b"42").is_err());
  }
}
