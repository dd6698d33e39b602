//! GL 4.x entry points `glow` has no wrapper for, loaded from the same proc address source
//! as the `glow` context.

use std::ffi::c_void;
use std::mem;

use super::error::*;

macro_rules! entry_points {
    ($($field:ident = $symbol:literal: fn($($arg:ident: $ty:ty),*);)*) => {
        #[derive(Default)]
        pub(crate) struct EntryPoints {
            $($field: Option<unsafe extern "system" fn($($ty),*)>,)*
        }

        impl EntryPoints {
            /// Looks up every entry point. A null address leaves that entry point unavailable.
            pub(crate) fn load(mut loader: impl FnMut(&str) -> *const c_void) -> Self {
                Self {
                    $($field: {
                        let address = loader($symbol);
                        if address.is_null() {
                            None
                        } else {
                            Some(unsafe {
                                mem::transmute::<*const c_void, unsafe extern "system" fn($($ty),*)>(
                                    address,
                                )
                            })
                        }
                    },)*
                }
            }

            /// GL symbols the driver didn't provide.
            pub(crate) fn missing(&self) -> Vec<&'static str> {
                let mut missing = vec![];
                $(if self.$field.is_none() {
                    missing.push($symbol);
                })*
                missing
            }

            $(
                pub(crate) unsafe fn $field(&self, $($arg: $ty),*) -> Result<(), WebGlError> {
                    let function = self.$field.ok_or(WebGlError::Unavailable($symbol))?;
                    function($($arg),*);
                    Ok(())
                }
            )*
        }
    };
}

entry_points! {
    clear_buffer_data = "glClearBufferData": fn(
        target: u32,
        internal_format: u32,
        format: u32,
        ty: u32,
        data: *const c_void
    );
    clear_buffer_sub_data = "glClearBufferSubData": fn(
        target: u32,
        internal_format: u32,
        offset: isize,
        size: isize,
        format: u32,
        ty: u32,
        data: *const c_void
    );
    clear_tex_image = "glClearTexImage": fn(
        texture: u32,
        level: i32,
        format: u32,
        ty: u32,
        data: *const c_void
    );
    get_vertex_attrib_pointer = "glGetVertexAttribPointerv": fn(
        index: u32,
        pname: u32,
        pointer: *mut *mut c_void
    );
    dispatch_compute_group_size = "glDispatchComputeGroupSizeARB": fn(
        groups_x: u32,
        groups_y: u32,
        groups_z: u32,
        size_x: u32,
        size_y: u32,
        size_z: u32
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static DISPATCHED: Cell<[u32; 6]> = Cell::new([0; 6]);
    }

    extern "system" fn fake_dispatch(gx: u32, gy: u32, gz: u32, sx: u32, sy: u32, sz: u32) {
        DISPATCHED.with(|d| d.set([gx, gy, gz, sx, sy, sz]));
    }

    fn only_dispatch(name: &str) -> *const c_void {
        if name == "glDispatchComputeGroupSizeARB" {
            fake_dispatch as *const c_void
        } else {
            std::ptr::null()
        }
    }

    #[test]
    fn loaded_entry_points_are_called() {
        let entry_points = EntryPoints::load(only_dispatch);
        unsafe { entry_points.dispatch_compute_group_size(1, 2, 3, 8, 8, 1) }.unwrap();
        assert_eq!(DISPATCHED.with(Cell::get), [1, 2, 3, 8, 8, 1]);
    }

    #[test]
    fn missing_entry_points_report_their_symbol() {
        let entry_points = EntryPoints::load(only_dispatch);
        assert_eq!(
            entry_points.missing(),
            [
                "glClearBufferData",
                "glClearBufferSubData",
                "glClearTexImage",
                "glGetVertexAttribPointerv"
            ]
        );
        let result =
            unsafe { entry_points.clear_tex_image(1, 0, glow::RGBA, glow::UNSIGNED_BYTE, std::ptr::null()) };
        assert_eq!(result, Err(WebGlError::Unavailable("glClearTexImage")));
    }

    #[test]
    fn default_table_is_empty() {
        assert_eq!(EntryPoints::default().missing().len(), 5);
    }
}
