use log::debug;
use math_objects::{EngineSettings, MathObject, MathObjectStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "wasm",
    derive(tsify::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub enum SerializedDataType {
    JsonMathObjects,
}

#[derive(Deserialize, Serialize)]
struct SerializedData<T> {
    version: u32,
    data: T,
}

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("Could not serialize as JSON")]
    Json(#[from] serde_json::Error),
    #[error("The math objects do not fit together: {0}")]
    InvalidStore(#[from] StoreError),
    #[error("Version {0} is not supported")]
    UnsupportedVersion(u32),
    #[error("Unknown data format")]
    UnknownFormat,
}

pub fn serialize_math_objects(
    objects: &[MathObject],
    data_type: SerializedDataType,
) -> Result<String, SerializationError> {
    let data = &SerializedData {
        version: CURRENT_VERSION,
        data: objects,
    };
    match data_type {
        SerializedDataType::JsonMathObjects => Ok(serde_json::to_string(data)?),
    }
}

pub fn deserialize_math_objects(
    data: &str,
    data_type: Option<SerializedDataType>,
) -> Result<Vec<MathObject>, SerializationError> {
    let data_type = match data_type {
        Some(data_type) => data_type,
        None => detect_data_type(data)?,
    };
    match data_type {
        SerializedDataType::JsonMathObjects => {
            let data: SerializedData<Vec<MathObject>> = serde_json::from_str(data)?;
            if data.version != CURRENT_VERSION {
                return Err(SerializationError::UnsupportedVersion(data.version));
            }
            Ok(data.data)
        }
    }
}

/// Reads a snapshot and checks that its anchors still make a valid store
pub fn restore_store(
    data: &str,
    data_type: Option<SerializedDataType>,
    settings: EngineSettings,
) -> Result<MathObjectStore, SerializationError> {
    let objects = deserialize_math_objects(data, data_type)?;
    let store = MathObjectStore::restore(settings, objects)?;
    debug!("restored {} math objects", store.len());
    Ok(store)
}

/// Missing fields keep their default value
pub fn deserialize_settings(data: &str) -> Result<EngineSettings, SerializationError> {
    Ok(serde_json::from_str(data)?)
}

fn detect_data_type(data: &str) -> Result<SerializedDataType, SerializationError> {
    if data.trim_start().starts_with('{') {
        Ok(SerializedDataType::JsonMathObjects)
    } else {
        Err(SerializationError::UnknownFormat)
    }
}
