pub mod event;
pub mod message;
pub mod subscriber;

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    let value = value?.trim().to_owned();
    (!value.is_empty()).then_some(value)
}
