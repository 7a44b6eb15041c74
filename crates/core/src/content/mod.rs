//! Encryption of object model text fields
//!
//! Only `displayName` and `content` are encrypted. Both helpers are
//! all-or-nothing: if the key is missing or any field fails, the input is
//! returned unchanged.

pub mod ports;

use webex_domain::{ActivityModel, ObjectBase, ObjectModel, Result};

pub use ports::ContentCipher;

pub fn encrypt_object(
    model: &ObjectModel,
    key: Option<&str>,
    cipher: &dyn ContentCipher,
) -> ObjectModel {
    transform(model, key, |key, text| cipher.encrypt(key, text))
}

pub fn decrypt_object(
    model: &ObjectModel,
    key: Option<&str>,
    cipher: &dyn ContentCipher,
) -> ObjectModel {
    transform(model, key, |key, text| cipher.decrypt(key, text))
}

/// Decrypts the object of a conversation activity.
pub fn decrypt_activity(
    activity: &ActivityModel,
    key: Option<&str>,
    cipher: &dyn ContentCipher,
) -> ActivityModel {
    ActivityModel {
        object: activity.object.as_ref().map(|object| decrypt_object(object, key, cipher)),
        ..activity.clone()
    }
}

fn transform<F>(model: &ObjectModel, key: Option<&str>, apply: F) -> ObjectModel
where
    F: Fn(&str, &str) -> Result<String>,
{
    let Some(key) = key else {
        return model.clone();
    };

    let mut transformed = model.clone();
    match transform_base(transformed.base_mut(), key, &apply) {
        Ok(()) => transformed,
        Err(error) => {
            tracing::warn!(
                object_type = model.object_type(),
                %error,
                "content transform failed, keeping original"
            );
            model.clone()
        }
    }
}

fn transform_base<F>(base: &mut ObjectBase, key: &str, apply: &F) -> Result<()>
where
    F: Fn(&str, &str) -> Result<String>,
{
    if let Some(display_name) = base.display_name.as_deref() {
        base.display_name = Some(apply(key, display_name)?);
    }
    if let Some(content) = base.content.as_deref() {
        base.content = Some(apply(key, content)?);
    }
    Ok(())
}
