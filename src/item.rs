use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single piece of tracked equipment.
///
/// Every field is free text. Fields that are missing or `null` come back as
/// empty strings, other non-string values as their JSON text, and anything not
/// modelled here is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub serial: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub purchased_within: String,
    #[serde(deserialize_with = "lenient_text")]
    pub current_owner: String,
    #[serde(deserialize_with = "lenient_text")]
    pub date_borrowed: String,
    #[serde(deserialize_with = "lenient_text")]
    pub image_path: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    /// A blank item with only the id set.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn status(&self) -> RentalStatus {
        if self.current_owner.is_empty() {
            RentalStatus::Available
        } else {
            RentalStatus::Rented
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Serial => &self.serial,
            Field::Description => &self.description,
            Field::PurchasedWithin => &self.purchased_within,
            Field::CurrentOwner => &self.current_owner,
            Field::DateBorrowed => &self.date_borrowed,
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Serial => self.serial = value,
            Field::Description => self.description = value,
            Field::PurchasedWithin => self.purchased_within = value,
            Field::CurrentOwner => self.current_owner = value,
            Field::DateBorrowed => self.date_borrowed = value,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A random 9 character base-36 token, the id format drafted items get before
/// they reach the server.
pub fn random_id() -> String {
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(9);
    for _ in 0..9 {
        id.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    id
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStatus {
    Available,
    Rented,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Available => "available",
            RentalStatus::Rented => "rented",
        }
    }
}

/// The editable text columns of an [Item], in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Serial,
    Description,
    PurchasedWithin,
    CurrentOwner,
    DateBorrowed,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Serial,
        Field::Description,
        Field::PurchasedWithin,
        Field::CurrentOwner,
        Field::DateBorrowed,
    ];

    /// JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Serial => "serial",
            Field::Description => "description",
            Field::PurchasedWithin => "purchasedWithin",
            Field::CurrentOwner => "currentOwner",
            Field::DateBorrowed => "dateBorrowed",
        }
    }

    /// Column header shown in the list view.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Item Name",
            Field::Serial => "Serial/ID",
            Field::Description => "Description",
            Field::PurchasedWithin => "Purchased Within Project/Team",
            Field::CurrentOwner => "Current Owner / Lended Out To",
            Field::DateBorrowed => "Date When Borrowed",
        }
    }
}
