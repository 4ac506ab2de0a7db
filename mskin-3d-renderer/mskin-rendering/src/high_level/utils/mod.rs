mod macros;

pub(crate) use macros::camera_getters_setters;
