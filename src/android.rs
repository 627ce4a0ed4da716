//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge. Preferences
//! travel as the same JSON the settings screen stores; a null string means
//! defaults.

use jni::objects::{JByteArray, JClass, JString};
use jni::sys::{jfloat, jstring};
use jni::JNIEnv;

use crate::{render_bytes_to_svg, render_file_to_svg, Error, LayoutPreferences};

fn optional_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
    if value.is_null() {
        None
    } else {
        env.get_string(value).ok().map(|s| s.into())
    }
}

fn preferences(env: &mut JNIEnv, prefs_json: &JString) -> Result<LayoutPreferences, Error> {
    match optional_string(env, prefs_json) {
        Some(json) => Ok(LayoutPreferences::from_json(&json)?),
        None => Ok(LayoutPreferences::default()),
    }
}

fn to_jstring(env: &mut JNIEnv, result: Result<String, Error>) -> jstring {
    match result {
        Ok(svg) => match env.new_string(&svg) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(e) => {
            log::error!("render failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Render a score file at the given path to SVG.
///
/// Called from Kotlin as:
///   external fun renderFile(path: String, prefsJson: String?, width: Float): String?
#[no_mangle]
pub extern "system" fn Java_com_snlayout_app_SnLayout_renderFile(
    mut env: JNIEnv,
    _class: JClass,
    path: JString,
    prefs_json: JString,
    width: jfloat,
) -> jstring {
    let path_str: String = match env.get_string(&path) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    let result = preferences(&mut env, &prefs_json)
        .and_then(|prefs| render_file_to_svg(&path_str, &prefs, width as f64));
    to_jstring(&mut env, result)
}

/// Render score bytes to SVG.
///
/// Called from Kotlin as:
///   external fun renderBytes(data: ByteArray, extension: String?, prefsJson: String?, width: Float): String?
#[no_mangle]
pub extern "system" fn Java_com_snlayout_app_SnLayout_renderBytes(
    mut env: JNIEnv,
    _class: JClass,
    data: JByteArray,
    extension: JString,
    prefs_json: JString,
    width: jfloat,
) -> jstring {
    let bytes = match env.convert_byte_array(&data) {
        Ok(b) => b,
        Err(_) => return std::ptr::null_mut(),
    };
    let ext = optional_string(&mut env, &extension);

    let result = preferences(&mut env, &prefs_json)
        .and_then(|prefs| render_bytes_to_svg(&bytes, ext.as_deref(), &prefs, width as f64));
    to_jstring(&mut env, result)
}
