/// UI rendering module
///
/// Pure view functions over the gallery state; all changes go back
/// through `Message`.

pub mod gallery;
