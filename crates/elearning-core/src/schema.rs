//! Opt-in XSD schema validation for SCORM 2004 manifests, via direct
//! libxml2 FFI.
//!
//! Not a contract of the core -- see [`crate::parser::ParserOptions::validate_xml_against_schema`]
//! and §4.12 of the parsing pipeline design. Grounded on a libxml2 FFI
//! wrapper: schema parsing goes through `xmlSchemaNewMemParserCtxt` +
//! `xmlSchemaParse` (NOT thread-safe, so callers must serialize it), and
//! validation through a dedicated `xmlSchemaValidCtxt` per call (thread-safe
//! once a schema exists). `xmlSchemaValidateFile` takes a path rather than
//! an in-memory document, so directory-backed packages are validated in
//! place and anything else is spilled to a scratch file first.

use crate::diagnostics::{Location, ValidationIssue, ValidationResult};
use crate::error::CoreError;
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};
use std::sync::Once;

static LIBXML2_INIT: Once = Once::new();

#[repr(C)]
struct XmlSchema {
    _private: [u8; 0],
}
#[repr(C)]
struct XmlSchemaParserCtxt {
    _private: [u8; 0],
}
#[repr(C)]
struct XmlSchemaValidCtxt {
    _private: [u8; 0],
}

#[repr(C)]
struct XmlError {
    domain: c_int,
    code: c_int,
    message: *const c_char,
    level: c_int,
    file: *const c_char,
    line: c_int,
    str1: *const c_char,
    str2: *const c_char,
    str3: *const c_char,
    int1: c_int,
    int2: c_int,
    ctxt: *mut c_void,
    node: *mut c_void,
}

type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *mut XmlError)>;

#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    fn xmlInitParser();
    fn xmlSchemaNewMemParserCtxt(buffer: *const c_char, size: c_int) -> *mut XmlSchemaParserCtxt;
    fn xmlSchemaParse(ctxt: *const XmlSchemaParserCtxt) -> *mut XmlSchema;
    fn xmlSchemaFreeParserCtxt(ctxt: *mut XmlSchemaParserCtxt);
    fn xmlSchemaFree(schema: *mut XmlSchema);
    fn xmlSchemaNewValidCtxt(schema: *const XmlSchema) -> *mut XmlSchemaValidCtxt;
    fn xmlSchemaFreeValidCtxt(ctxt: *mut XmlSchemaValidCtxt);
    fn xmlSchemaValidateFile(
        ctxt: *const XmlSchemaValidCtxt,
        file_name: *const c_char,
        options: c_int,
    ) -> c_int;
    fn xmlSchemaSetValidStructuredErrors(
        ctxt: *mut XmlSchemaValidCtxt,
        sherr: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
}

unsafe extern "C" fn collect_error(user_data: *mut c_void, error: *mut XmlError) {
    let errors = unsafe { &mut *(user_data as *mut Vec<String>) };
    if error.is_null() {
        return;
    }
    let message = unsafe { (*error).message };
    let line = unsafe { (*error).line };
    if message.is_null() {
        return;
    }
    let text = unsafe { std::ffi::CStr::from_ptr(message) }
        .to_string_lossy()
        .trim()
        .to_string();
    errors.push(if line > 0 {
        format!("line {line}: {text}")
    } else {
        text
    });
}

/// Validate `manifest_path`'s bytes, read from disk at `local_path`,
/// against `schema_xsd`. Returns one ERROR [`ValidationIssue`] per
/// reported schema violation, aggregated into a single result -- never an
/// exception, matching `Manifest/SchemaValidation`'s "one issue per schema
/// error, aggregated" contract.
pub fn validate_file_against_schema(
    local_path: &std::path::Path,
    manifest_path: &str,
    schema_xsd: &[u8],
) -> Result<ValidationResult, CoreError> {
    LIBXML2_INIT.call_once(|| unsafe { xmlInitParser() });

    let path_c = CString::new(local_path.as_os_str().as_encoded_bytes())
        .map_err(|e| schema_error(manifest_path, e.to_string()))?;

    unsafe {
        let parser_ctxt =
            xmlSchemaNewMemParserCtxt(schema_xsd.as_ptr() as *const c_char, schema_xsd.len() as c_int);
        if parser_ctxt.is_null() {
            return Err(schema_error(manifest_path, "could not allocate a schema parser context".into()));
        }
        let schema = xmlSchemaParse(parser_ctxt);
        xmlSchemaFreeParserCtxt(parser_ctxt);
        if schema.is_null() {
            return Err(schema_error(manifest_path, "the configured XSD schema itself is not well-formed".into()));
        }

        let valid_ctxt = xmlSchemaNewValidCtxt(schema);
        if valid_ctxt.is_null() {
            xmlSchemaFree(schema);
            return Err(schema_error(manifest_path, "could not allocate a schema validation context".into()));
        }

        let mut collected: Vec<String> = Vec::new();
        xmlSchemaSetValidStructuredErrors(
            valid_ctxt,
            Some(collect_error),
            &mut collected as *mut Vec<String> as *mut c_void,
        );

        let code = xmlSchemaValidateFile(valid_ctxt, path_c.as_ptr(), 0);

        xmlSchemaFreeValidCtxt(valid_ctxt);
        xmlSchemaFree(schema);

        if code == 0 {
            return Ok(ValidationResult::valid());
        }
        if code < 0 {
            return Err(schema_error(
                manifest_path,
                format!("libxml2 reported an internal error (code {code}) while validating"),
            ));
        }

        if collected.is_empty() {
            collected.push(format!("{code} schema violation(s) reported without detail"));
        }
        let issues = collected
            .into_iter()
            .map(|message| {
                ValidationIssue::error(
                    "MANIFEST_SCHEMA_VALIDATION",
                    message,
                    Location::path(manifest_path.to_string()),
                )
            })
            .collect();
        Ok(ValidationResult::from_issues(issues))
    }
}

fn schema_error(path: &str, detail: String) -> CoreError {
    CoreError::ManifestSchemaValidation {
        path: path.to_string(),
        detail,
    }
}
