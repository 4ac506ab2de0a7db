/// Generates `get_`, `get_..._as_ref` and `set_` accessors for camera fields.
/// Every setter recomputes the cached model-view-projection matrix.
macro_rules! camera_getters_setters {
    ($name: ident: $_type: ty) => {
        paste::paste! {
            pub fn [<get_ $name>](&self) -> $_type {
                self.$name
            }

            pub fn [<get_ $name _as_ref>](&self) -> &$_type {
                &self.$name
            }

            pub fn [<set_ $name>](&mut self, $name: $_type) {
                self.$name = $name;
                self.recompute_mvp();
            }
        }
    };
    ($($name: ident: $_type: ty),*) => {
        $(
            camera_getters_setters!($name: $_type);
        )*
    };
}

pub(crate) use camera_getters_setters;
