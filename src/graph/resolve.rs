//! Module specifier resolution.
//!
//! Maps the module text of an import statement to a file of the same
//! project. Paths are relative to the project root. Package imports that
//! live outside the project (npm packages, site-packages) do not resolve.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::analysis::SourceLanguage;

/// Extensions tried, in order, for extension-less JavaScript/TypeScript specifiers.
pub const ECMASCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Directories searched for absolute Python modules.
const PYTHON_SOURCE_ROOTS: &[&str] = &["", "src"];

/// Resolves module specifiers against the set of files in a project.
#[derive(Debug, Clone, Default)]
pub struct ModuleResolver {
    files: HashSet<PathBuf>,
}

impl ModuleResolver {
    /// Create a resolver over project-relative file paths.
    pub fn new<I>(files: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            files: files.into_iter().collect(),
        }
    }

    /// Resolve `module` as imported from `importer`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::path::{Path, PathBuf};
    /// use importsweep::analysis::SourceLanguage;
    /// use importsweep::graph::ModuleResolver;
    ///
    /// let resolver = ModuleResolver::new(vec![PathBuf::from("src/utils.ts")]);
    /// let resolved = resolver.resolve(Path::new("src/app.ts"), "./utils", SourceLanguage::TypeScript);
    /// assert_eq!(resolved, Some(PathBuf::from("src/utils.ts")));
    /// ```
    pub fn resolve(&self, importer: &Path, module: &str, language: SourceLanguage) -> Option<PathBuf> {
        match language {
            SourceLanguage::Python => self.resolve_python(importer, module),
            _ => self.resolve_ecmascript(importer, module),
        }
    }

    fn resolve_python(&self, importer: &Path, module: &str) -> Option<PathBuf> {
        let dots = module.chars().take_while(|c| *c == '.').count();
        let rest = &module[dots..];
        let relative: PathBuf = rest.split('.').filter(|s| !s.is_empty()).collect();

        let bases: Vec<PathBuf> = if dots == 0 {
            PYTHON_SOURCE_ROOTS.iter().map(PathBuf::from).collect()
        } else {
            // One dot is the importer's package, each extra dot goes up a level
            let mut base = importer.parent()?.to_path_buf();
            for _ in 1..dots {
                base = base.parent()?.to_path_buf();
            }
            vec![base]
        };

        bases.iter().find_map(|base| {
            let stem = base.join(&relative);
            if rest.is_empty() {
                return self.existing(stem.join("__init__.py"));
            }
            self.existing(stem.with_extension("py"))
                .or_else(|| self.existing(stem.with_extension("pyi")))
                .or_else(|| self.existing(stem.join("__init__.py")))
        })
    }

    fn resolve_ecmascript(&self, importer: &Path, module: &str) -> Option<PathBuf> {
        let relative = matches!(module, "." | "..") || module.starts_with("./") || module.starts_with("../");
        if !relative {
            return None;
        }

        let base = importer.parent().unwrap_or(Path::new("")).join(module).clean();

        if let Some(found) = self.existing(base.clone()) {
            return Some(found);
        }

        // ESM TypeScript imports compiled names: './util.js' refers to util.ts
        if let Some(stem) = module.strip_suffix(".js") {
            let stem = importer.parent().unwrap_or(Path::new("")).join(stem).clean();
            for ext in ["ts", "tsx"] {
                if let Some(found) = self.existing(append_extension(&stem, ext)) {
                    return Some(found);
                }
            }
        }

        ECMASCRIPT_EXTENSIONS
            .iter()
            .find_map(|ext| self.existing(append_extension(&base, ext)))
            .or_else(|| {
                ECMASCRIPT_EXTENSIONS
                    .iter()
                    .find_map(|ext| self.existing(base.join(format!("index.{}", ext))))
            })
    }

    fn existing(&self, candidate: PathBuf) -> Option<PathBuf> {
        let candidate = candidate.clean();
        self.files.contains(&candidate).then_some(candidate)
    }
}

/// `./a.b` + `ts` gives `./a.b.ts` (unlike `with_extension`).
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}
