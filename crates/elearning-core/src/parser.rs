//! Parsing orchestration: the template-method pipeline every standard runs
//! (`read manifest -> validate -> extract metadata`) and the factory that
//! picks a standard's parser for a package root.
//!
//! Rust has no inheritance, so the template method lives as default methods
//! on the [`Parser`] trait; [`BaseParser`] holds the state every
//! implementor shares (the package's [`FileAccess`] and its
//! [`ParserOptions`]) and each standard's parser wraps one.

use crate::diagnostics::ValidationResult;
use crate::error::CoreError;
use crate::fs::FileAccess;
use crate::manifest::{LomFragment, ModuleMetadata, ModuleType, PackageManifest};
use std::path::PathBuf;
use std::sync::Arc;

/// Byte-granular progress callback for streaming reads. Not invoked by any
/// `FileAccess` implementation in this crate today -- manifests and AICC
/// descriptors are read whole -- but part of the configuration surface so a
/// caller layering chunked I/O over a custom `FileAccess` has somewhere to
/// plug in without changing `ParserOptions`'s shape.
pub type ProgressListener = Arc<dyn Fn(u64) + Send + Sync>;

/// Runtime policy for a parse, independent of which standard is involved.
#[derive(Clone)]
pub struct ParserOptions {
    strict_mode: bool,
    validate_xml_against_schema: bool,
    schema_xsd: Option<Arc<[u8]>>,
    progress_listener: Option<ProgressListener>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            validate_xml_against_schema: xsd_validation_from_env(),
            schema_xsd: None,
            progress_listener: None,
        }
    }
}

impl ParserOptions {
    pub fn builder() -> ParserOptionsBuilder {
        ParserOptionsBuilder::default()
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub fn validate_xml_against_schema(&self) -> bool {
        self.validate_xml_against_schema
    }

    pub fn schema_xsd(&self) -> Option<&[u8]> {
        self.schema_xsd.as_deref()
    }

    pub fn progress_listener(&self) -> Option<&ProgressListener> {
        self.progress_listener.as_ref()
    }
}

/// Read `ELEARNING_SCORM2004_VALIDATE_XSD` as a caller-supplied override for
/// [`ParserOptions::validate_xml_against_schema`]'s default, captured once at
/// construction rather than re-read per call.
fn xsd_validation_from_env() -> bool {
    std::env::var("ELEARNING_SCORM2004_VALIDATE_XSD")
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(false)
}

/// Builder mirroring the teacher's builder-style construction of its
/// detector chain and diagnostics.
#[derive(Default)]
pub struct ParserOptionsBuilder {
    options: ParserOptionsInner,
}

#[derive(Default)]
struct ParserOptionsInner {
    strict_mode: bool,
    validate_xml_against_schema: Option<bool>,
    schema_xsd: Option<Arc<[u8]>>,
    progress_listener: Option<ProgressListener>,
}

impl ParserOptionsBuilder {
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.options.strict_mode = strict;
        self
    }

    pub fn validate_xml_against_schema(mut self, validate: bool) -> Self {
        self.options.validate_xml_against_schema = Some(validate);
        self
    }

    pub fn schema_xsd(mut self, xsd: impl Into<Arc<[u8]>>) -> Self {
        self.options.schema_xsd = Some(xsd.into());
        self
    }

    pub fn progress_listener(mut self, listener: ProgressListener) -> Self {
        self.options.progress_listener = Some(listener);
        self
    }

    pub fn build(self) -> ParserOptions {
        ParserOptions {
            strict_mode: self.options.strict_mode,
            validate_xml_against_schema: self
                .options
                .validate_xml_against_schema
                .unwrap_or_else(xsd_validation_from_env),
            schema_xsd: self.options.schema_xsd,
            progress_listener: self.options.progress_listener,
        }
    }
}

/// The outcome of a successful parse: validation findings plus the
/// normalized metadata, both immutable by construction once returned.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub validation: ValidationResult,
    pub metadata: ModuleMetadata,
}

/// Shared state every per-standard [`Parser`] wraps: the package's
/// [`FileAccess`] and the options governing this parse.
pub struct BaseParser {
    access: Box<dyn FileAccess>,
    options: ParserOptions,
}

impl BaseParser {
    pub fn new(access: Box<dyn FileAccess>, options: ParserOptions) -> Self {
        Self { access, options }
    }

    pub fn access(&self) -> &dyn FileAccess {
        self.access.as_ref()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, CoreError> {
        let _span = tracing::info_span!("file_access.open", path).entered();
        let bytes = crate::fs::read_all(self.access.as_ref(), path)?;
        if let Some(listener) = &self.options.progress_listener {
            listener(bytes.len() as u64);
        }
        Ok(bytes)
    }

    /// Best-effort load of every external LOM fragment the manifest XML
    /// referenced via `<metadata><location>`. A location that doesn't
    /// resolve to an entry is silently skipped; one that resolves but is
    /// not well-formed XML raises `Metadata/Load`, lenient (attached to the
    /// result as a warning) or strict (propagated) per [`ParserOptions::strict_mode`].
    fn load_lom(&self, locations: &[String]) -> Result<(Vec<LomFragment>, ValidationResult), CoreError> {
        let mut fragments = Vec::new();
        let mut findings = ValidationResult::valid();

        for location in locations {
            let Some(resolved) = self.access.resolve_case(location) else {
                tracing::trace!(location, "external LOM location not found, skipping");
                continue;
            };
            tracing::trace!(location = resolved.as_str(), "loading external LOM fragment");
            let bytes = self.read_bytes(&resolved)?;
            let text = match crate::xml::decode_xml(&bytes, &resolved) {
                Ok(text) => text,
                Err(err) => {
                    self.handle_lom_error(&resolved, err, &mut findings)?;
                    continue;
                }
            };
            if let Err(err) = crate::xml::parse(&text, &resolved) {
                self.handle_lom_error(&resolved, err, &mut findings)?;
                continue;
            }
            fragments.push(LomFragment {
                location: resolved,
                raw_xml: text,
            });
        }

        Ok((fragments, findings))
    }

    fn handle_lom_error(
        &self,
        location: &str,
        err: CoreError,
        findings: &mut ValidationResult,
    ) -> Result<(), CoreError> {
        let reason = err.to_string();
        tracing::warn!(location, reason = reason.as_str(), "Metadata/Load failed");
        if self.options.strict_mode {
            return Err(CoreError::MetadataLoad {
                path: PathBuf::from(location),
                reason,
            });
        }
        *findings = findings.clone().merge(ValidationResult::single(
            crate::diagnostics::ValidationIssue::warning(
                "METADATA_LOAD_FAILED",
                format!("could not load external metadata at {location}: {reason}"),
                crate::diagnostics::Location::path(location.to_string()),
            ),
        ));
        Ok(())
    }
}

/// Per-standard parsing behavior. The default methods here ARE the template
/// method described by `parse_and_validate`/`parse_only`; a standard only
/// supplies [`Parser::read_manifest`] and [`Parser::extract_metadata`] (and,
/// for SCORM 2004, [`Parser::build_activity_tree`]).
pub trait Parser {
    fn module_type(&self) -> ModuleType;

    fn base(&self) -> &BaseParser;

    /// Step (1): locate and parse this standard's manifest, consulting
    /// `self.base().access()`.
    fn read_manifest(&self) -> Result<PackageManifest, CoreError>;

    /// Step (2)'s rule list, SCORM 1.2 default unless overridden.
    fn rules(&self) -> Vec<Box<dyn crate::validation::ValidationRule>> {
        crate::validation::rules_for(self.module_type())
    }

    /// SCORM 2004's auxiliary activity tree; every other standard has none.
    fn build_activity_tree(&self, _manifest: &PackageManifest) -> Option<crate::activity_tree::ActivityTree> {
        None
    }

    /// Opt-in XSD validation, run only when [`ParserOptions::validate_xml_against_schema`]
    /// is set and a schema was supplied; every standard other than SCORM 2004
    /// leaves this at the default no-op.
    #[cfg(feature = "schema-validation")]
    fn schema_validation(&self, _manifest_path: &str) -> Result<ValidationResult, CoreError> {
        Ok(ValidationResult::valid())
    }

    /// Step (3): build the final metadata object. The default loads any
    /// external LOM fragments the manifest referenced and attaches the
    /// activity tree, if any.
    fn extract_metadata(
        &self,
        mut manifest: PackageManifest,
        findings: &mut ValidationResult,
    ) -> Result<ModuleMetadata, CoreError> {
        let locations = std::mem::take(&mut manifest.lom_locations);
        let (lom, lom_findings) = self.base().load_lom(&locations)?;
        manifest.lom = lom;
        *findings = findings.clone().merge(lom_findings);

        let activity_tree = self.build_activity_tree(&manifest);
        Ok(ModuleMetadata {
            manifest,
            activity_tree,
        })
    }

    /// The full pipeline: manifest read, then rule validation, then
    /// metadata extraction. Any failure in step (1) is wrapped as
    /// `Manifest/Parse`; step (2) never fails (rules only ever produce
    /// findings); step (3) can still fail via strict-mode LOM loading.
    fn parse_and_validate(&self) -> Result<ParseResult, CoreError> {
        let module_type = self.module_type();
        let _span = tracing::info_span!("parser.parse_and_validate", %module_type).entered();

        let manifest = self.read_manifest().map_err(|source| CoreError::ManifestParse {
            module_type: module_type.to_string(),
            issues: source.to_string(),
            source: Some(Box::new(source)),
        })?;

        let rules = self.rules();
        let mut validation = crate::validation::run_all(&rules, &manifest);

        #[cfg(feature = "schema-validation")]
        if self.base().options.validate_xml_against_schema {
            if let Some(path) = self.manifest_path_for_schema() {
                validation = validation.merge(self.schema_validation(&path)?);
            }
        }

        let metadata = self.extract_metadata(manifest, &mut validation)?;
        Ok(ParseResult {
            validation,
            metadata,
        })
    }

    /// Identical to [`Parser::parse_and_validate`]'s steps (1) and (3), with
    /// validation fixed at [`ValidationResult::valid`] -- no rules run.
    fn parse_only(&self) -> Result<ParseResult, CoreError> {
        let manifest = self.read_manifest().map_err(|source| CoreError::ManifestParse {
            module_type: self.module_type().to_string(),
            issues: source.to_string(),
            source: Some(Box::new(source)),
        })?;
        let mut validation = ValidationResult::valid();
        let metadata = self.extract_metadata(manifest, &mut validation)?;
        Ok(ParseResult {
            validation,
            metadata,
        })
    }

    /// Resolved manifest path used by the opt-in schema validator; only
    /// SCORM 2004 needs this, so the default is `None`.
    #[cfg(feature = "schema-validation")]
    fn manifest_path_for_schema(&self) -> Option<String> {
        None
    }
}

fn missing_manifest_error(module_type: ModuleType, candidate: &str) -> CoreError {
    CoreError::ManifestParse {
        module_type: module_type.to_string(),
        issues: format!("no `{candidate}` found in the package"),
        source: None,
    }
}

pub struct Scorm12Parser {
    base: BaseParser,
}

impl Scorm12Parser {
    pub fn new(base: BaseParser) -> Self {
        Self { base }
    }
}

impl Parser for Scorm12Parser {
    fn module_type(&self) -> ModuleType {
        ModuleType::Scorm12
    }

    fn base(&self) -> &BaseParser {
        &self.base
    }

    fn read_manifest(&self) -> Result<PackageManifest, CoreError> {
        let path = crate::manifest::scorm12::manifest_path(self.base.access())
            .ok_or_else(|| missing_manifest_error(ModuleType::Scorm12, "imsmanifest.xml"))?;
        let bytes = self.base.read_bytes(&path)?;
        crate::manifest::scorm12::parse(&bytes, &path)
    }
}

pub struct Scorm2004Parser {
    base: BaseParser,
}

impl Scorm2004Parser {
    pub fn new(base: BaseParser) -> Self {
        Self { base }
    }
}

impl Parser for Scorm2004Parser {
    fn module_type(&self) -> ModuleType {
        ModuleType::Scorm2004
    }

    fn base(&self) -> &BaseParser {
        &self.base
    }

    fn read_manifest(&self) -> Result<PackageManifest, CoreError> {
        let path = crate::manifest::scorm12::manifest_path(self.base.access())
            .ok_or_else(|| missing_manifest_error(ModuleType::Scorm2004, "imsmanifest.xml"))?;
        let bytes = self.base.read_bytes(&path)?;
        crate::manifest::scorm2004::parse(&bytes, &path)
    }

    fn build_activity_tree(&self, manifest: &PackageManifest) -> Option<crate::activity_tree::ActivityTree> {
        crate::manifest::scorm2004::build_activity_tree(manifest)
    }

    #[cfg(feature = "schema-validation")]
    fn schema_validation(&self, manifest_path: &str) -> Result<ValidationResult, CoreError> {
        let Some(schema_xsd) = self.base.options().schema_xsd() else {
            return Ok(ValidationResult::valid());
        };
        match self.base.access().local_path(manifest_path) {
            Some(local_path) => crate::schema::validate_file_against_schema(&local_path, manifest_path, schema_xsd),
            None => {
                let scratch = write_scratch_file(self.base.access(), manifest_path)?;
                crate::schema::validate_file_against_schema(scratch.path(), manifest_path, schema_xsd)
            }
        }
    }

    #[cfg(feature = "schema-validation")]
    fn manifest_path_for_schema(&self) -> Option<String> {
        crate::manifest::scorm12::manifest_path(self.base.access())
    }
}

pub struct AiccParser {
    base: BaseParser,
}

impl AiccParser {
    pub fn new(base: BaseParser) -> Self {
        Self { base }
    }
}

impl Parser for AiccParser {
    fn module_type(&self) -> ModuleType {
        ModuleType::Aicc
    }

    fn base(&self) -> &BaseParser {
        &self.base
    }

    fn read_manifest(&self) -> Result<PackageManifest, CoreError> {
        crate::manifest::aicc::parse(self.base.access())
    }
}

pub struct Cmi5Parser {
    base: BaseParser,
}

impl Cmi5Parser {
    pub fn new(base: BaseParser) -> Self {
        Self { base }
    }
}

impl Parser for Cmi5Parser {
    fn module_type(&self) -> ModuleType {
        ModuleType::Cmi5
    }

    fn base(&self) -> &BaseParser {
        &self.base
    }

    fn read_manifest(&self) -> Result<PackageManifest, CoreError> {
        let path = crate::manifest::cmi5::manifest_path(self.base.access())
            .ok_or_else(|| missing_manifest_error(ModuleType::Cmi5, "cmi5.xml"))?;
        let bytes = self.base.read_bytes(&path)?;
        crate::manifest::cmi5::parse(&bytes, &path)
    }
}

pub struct XapiParser {
    base: BaseParser,
}

impl XapiParser {
    pub fn new(base: BaseParser) -> Self {
        Self { base }
    }
}

impl Parser for XapiParser {
    fn module_type(&self) -> ModuleType {
        ModuleType::Xapi
    }

    fn base(&self) -> &BaseParser {
        &self.base
    }

    fn read_manifest(&self) -> Result<PackageManifest, CoreError> {
        let path = crate::manifest::xapi::manifest_path(self.base.access())
            .ok_or_else(|| missing_manifest_error(ModuleType::Xapi, "tincan.xml"))?;
        let bytes = self.base.read_bytes(&path)?;
        crate::manifest::xapi::parse(&bytes, &path)
    }
}

/// Spill `path`'s bytes to a scratch file on local disk so the XSD
/// validator (which needs a real filesystem path) can run against archive,
/// remote, or in-memory packages. Removed automatically when the returned
/// handle drops.
#[cfg(feature = "schema-validation")]
fn write_scratch_file(access: &dyn FileAccess, path: &str) -> Result<tempfile::TempPath, CoreError> {
    use std::io::Write;

    let bytes = crate::fs::read_all(access, path)?;
    let mut file = tempfile::NamedTempFile::new().map_err(|source| {
        crate::error::FileAccessError::Io {
            path: sanitize(path),
            source,
        }
    })?;
    file.write_all(&bytes)
        .map_err(|source| crate::error::FileAccessError::Io {
            path: sanitize(path),
            source,
        })?;
    Ok(file.into_temp_path())
}

#[cfg(feature = "schema-validation")]
fn sanitize(path: &str) -> String {
    path.replace(['/', '\\'], "_")
}

/// Constructs the right [`FileAccess`] and [`Parser`] for a package root.
pub struct ParserFactory {
    detectors: crate::detection::ModuleTypeDetectorChain,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    pub fn new() -> Self {
        Self {
            detectors: crate::detection::ModuleTypeDetectorChain::with_defaults(),
        }
    }

    /// Build a factory over a custom detector chain, e.g.
    /// [`crate::detection::ModuleTypeDetectorChain::without_xapi`].
    pub fn with_detectors(detectors: crate::detection::ModuleTypeDetectorChain) -> Self {
        Self { detectors }
    }

    /// Detect the package's standard and construct its parser directly over
    /// an already-open [`FileAccess`].
    pub fn from_file_access(
        &self,
        access: Box<dyn FileAccess>,
        options: ParserOptions,
    ) -> Result<Box<dyn Parser>, CoreError> {
        let module_type = self
            .detectors
            .detect(access.as_ref())
            .ok_or_else(|| CoreError::DetectionUnknown {
                root: access.root().to_string(),
            })?;
        Ok(Self::parser_for(module_type, BaseParser::new(access, options)))
    }

    /// Construct a directory-backed package's parser.
    pub fn open(&self, root: impl Into<PathBuf>, options: ParserOptions) -> Result<Box<dyn Parser>, CoreError> {
        let access = crate::fs::DirectoryFileAccess::open(root.into())?;
        self.from_file_access(Box::new(access), options)
    }

    /// Construct a ZIP-packed package's parser.
    pub fn open_zip(&self, archive_path: impl Into<PathBuf>, options: ParserOptions) -> Result<Box<dyn Parser>, CoreError> {
        let access = crate::fs::ZipFileAccess::open(archive_path.into())?;
        self.from_file_access(Box::new(access), options)
    }

    fn parser_for(module_type: ModuleType, base: BaseParser) -> Box<dyn Parser> {
        match module_type {
            ModuleType::Scorm12 => Box::new(Scorm12Parser::new(base)),
            ModuleType::Scorm2004 => Box::new(Scorm2004Parser::new(base)),
            ModuleType::Aicc => Box::new(AiccParser::new(base)),
            ModuleType::Cmi5 => Box::new(Cmi5Parser::new(base)),
            ModuleType::Xapi => Box::new(XapiParser::new(base)),
        }
    }

    /// Detect, parse and validate in one call, applying the strict-mode
    /// wrapper: if `options.strict_mode()` and the result has errors, this
    /// raises `Manifest/Parse` instead of returning the result.
    pub fn open_and_parse(&self, root: impl Into<PathBuf>, options: ParserOptions) -> Result<ParseResult, CoreError> {
        let strict = options.strict_mode();
        let root = root.into();
        let is_archive = root
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        let parser = if is_archive {
            self.open_zip(root, options)?
        } else {
            self.open(root, options)?
        };
        let result = parser.parse_and_validate()?;
        if strict && result.validation.has_errors() {
            return Err(CoreError::ManifestParse {
                module_type: parser.module_type().to_string(),
                issues: result.validation.format_errors(),
                source: None,
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileAccess;

    fn scorm12_fixture() -> MockFileAccess {
        MockFileAccess::new().with_file(
            "imsmanifest.xml",
            r#"<?xml version="1.0"?>
<manifest identifier="course_1" xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <organizations default="org_1">
    <organization identifier="org_1">
      <title>Intro Course</title>
      <item identifier="item_1" identifierref="resource_1"><title>Lesson 1</title></item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="resource_1" adlcp:scormtype="sco" href="index.html"/>
  </resources>
</manifest>"#,
        )
    }

    #[test]
    fn scorm12_parse_and_validate_round_trips() {
        let base = BaseParser::new(Box::new(scorm12_fixture()), ParserOptions::default());
        let parser = Scorm12Parser::new(base);
        let result = parser.parse_and_validate().unwrap();
        assert!(result.validation.is_valid());
        assert_eq!(result.metadata.manifest.identifier.as_deref(), Some("course_1"));
    }

    #[test]
    fn parse_only_skips_validation() {
        let base = BaseParser::new(Box::new(MockFileAccess::new()), ParserOptions::default());
        let parser = Scorm12Parser::new(base);
        let err = parser.parse_only().unwrap_err();
        assert!(matches!(err, CoreError::ManifestParse { .. }));
    }

    #[test]
    fn factory_detects_and_dispatches() {
        let factory = ParserFactory::new();
        let parser = factory
            .from_file_access(Box::new(scorm12_fixture()), ParserOptions::default())
            .unwrap();
        assert_eq!(parser.module_type(), ModuleType::Scorm12);
    }

    #[test]
    fn factory_raises_on_unrecognized_layout() {
        let factory = ParserFactory::new();
        let err = factory
            .from_file_access(Box::new(MockFileAccess::new()), ParserOptions::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::DetectionUnknown { .. }));
    }

    #[test]
    fn strict_mode_raises_on_validation_errors() {
        let access = MockFileAccess::new().with_file("imsmanifest.xml", "<manifest/>");
        let base = BaseParser::new(Box::new(access), ParserOptions::builder().strict_mode(true).build());
        let parser = Scorm12Parser::new(base);
        let result = parser.parse_and_validate().unwrap();
        assert!(result.validation.has_errors());
    }

    #[test]
    fn missing_external_lom_is_skipped_not_an_error() {
        let mut access = scorm12_fixture();
        access.add_file(
            "imsmanifest.xml",
            r#"<?xml version="1.0"?>
<manifest identifier="course_1" xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <metadata><location>missing_lom.xml</location></metadata>
  <organizations default="org_1">
    <organization identifier="org_1">
      <title>Intro Course</title>
      <item identifier="item_1" identifierref="resource_1"><title>Lesson 1</title></item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="resource_1" adlcp:scormtype="sco" href="index.html"/>
  </resources>
</manifest>"#,
        );
        let base = BaseParser::new(Box::new(access), ParserOptions::default());
        let parser = Scorm12Parser::new(base);
        let result = parser.parse_and_validate().unwrap();
        assert!(result.metadata.manifest.lom.is_empty());
    }

    #[test]
    fn malformed_external_lom_is_lenient_warning_by_default() {
        let mut access = scorm12_fixture();
        access.add_file(
            "imsmanifest.xml",
            r#"<?xml version="1.0"?>
<manifest identifier="course_1" xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <metadata><location>lom.xml</location></metadata>
  <organizations default="org_1">
    <organization identifier="org_1">
      <title>Intro Course</title>
      <item identifier="item_1" identifierref="resource_1"><title>Lesson 1</title></item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="resource_1" adlcp:scormtype="sco" href="index.html"/>
  </resources>
</manifest>"#,
        );
        access.add_file("lom.xml", "<unclosed>");
        let base = BaseParser::new(Box::new(access), ParserOptions::default());
        let parser = Scorm12Parser::new(base);
        let result = parser.parse_and_validate().unwrap();
        assert!(result.validation.warnings().any(|i| i.code == "METADATA_LOAD_FAILED"));
    }

    #[test]
    fn malformed_external_lom_is_strict_error_when_configured() {
        let mut access = scorm12_fixture();
        access.add_file(
            "imsmanifest.xml",
            r#"<?xml version="1.0"?>
<manifest identifier="course_1" xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2">
  <metadata><location>lom.xml</location></metadata>
  <organizations default="org_1">
    <organization identifier="org_1">
      <title>Intro Course</title>
      <item identifier="item_1" identifierref="resource_1"><title>Lesson 1</title></item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="resource_1" adlcp:scormtype="sco" href="index.html"/>
  </resources>
</manifest>"#,
        );
        access.add_file("lom.xml", "<unclosed>");
        let base = BaseParser::new(Box::new(access), ParserOptions::builder().strict_mode(true).build());
        let parser = Scorm12Parser::new(base);
        let err = parser.parse_and_validate().unwrap_err();
        assert!(matches!(err, CoreError::MetadataLoad { .. }));
    }
}
