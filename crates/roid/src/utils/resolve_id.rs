use std::path::Path;

use roid_common::ResolvedId;
use roid_error::BuildDiagnostic;
use roid_resolver::Resolver;

/// Resolves `request` as written in `importer`. `importer_stable_id` only feeds
/// the diagnostic.
pub fn resolve_id(
  resolver: &Resolver,
  request: &str,
  importer: Option<&str>,
  importer_stable_id: Option<&str>,
  is_user_defined_entry: bool,
) -> Result<ResolvedId, BuildDiagnostic> {
  resolver
    .resolve(importer.map(Path::new), request, is_user_defined_entry)
    .map(|resolved| ResolvedId::new(resolved.path))
    .map_err(|err| BuildDiagnostic::Resolution {
      specifier: request.to_string(),
      importer: importer_stable_id.map(ToString::to_string),
      reason: err.to_string(),
    })
}
