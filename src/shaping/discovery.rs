//! Font file discovery: finding font files for a family on disk.
//!
//! Scans the platform font directories once into a filename index, then
//! resolves family names through a table of well-known monospace families
//! or by guessing the usual `Family-Style.ttf` file names. Pure discovery:
//! no font loading or shaping.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::font::FontStyle;

/// Candidate file names for the four style variants of a family.
struct FontFamily {
    name: &'static str,
    regular: &'static [&'static str],
    bold: &'static [&'static str],
    italic: &'static [&'static str],
    bold_italic: &'static [&'static str],
}

impl FontFamily {
    fn candidates(&self, style: FontStyle) -> &'static [&'static str] {
        match style {
            FontStyle::Regular => self.regular,
            FontStyle::Bold => self.bold,
            FontStyle::Italic => self.italic,
            FontStyle::BoldItalic => self.bold_italic,
        }
    }
}

/// Monospace families tried in priority order for generic requests.
const FONT_FAMILIES: &[FontFamily] = &[
    FontFamily {
        name: "JetBrains Mono",
        regular: &["JetBrainsMono-Regular.ttf", "JetBrainsMonoNerdFont-Regular.ttf"],
        bold: &["JetBrainsMono-Bold.ttf", "JetBrainsMonoNerdFont-Bold.ttf"],
        italic: &["JetBrainsMono-Italic.ttf", "JetBrainsMonoNerdFont-Italic.ttf"],
        bold_italic: &["JetBrainsMono-BoldItalic.ttf", "JetBrainsMonoNerdFont-BoldItalic.ttf"],
    },
    FontFamily {
        name: "DejaVu Sans Mono",
        regular: &["DejaVuSansMono.ttf"],
        bold: &["DejaVuSansMono-Bold.ttf"],
        italic: &["DejaVuSansMono-Oblique.ttf"],
        bold_italic: &["DejaVuSansMono-BoldOblique.ttf"],
    },
    FontFamily {
        name: "Liberation Mono",
        regular: &["LiberationMono-Regular.ttf"],
        bold: &["LiberationMono-Bold.ttf"],
        italic: &["LiberationMono-Italic.ttf"],
        bold_italic: &["LiberationMono-BoldItalic.ttf"],
    },
    FontFamily {
        name: "Ubuntu Mono",
        regular: &["UbuntuMono-Regular.ttf", "UbuntuMono-R.ttf"],
        bold: &["UbuntuMono-Bold.ttf", "UbuntuMono-B.ttf"],
        italic: &["UbuntuMono-Italic.ttf", "UbuntuMono-RI.ttf"],
        bold_italic: &["UbuntuMono-BoldItalic.ttf", "UbuntuMono-BI.ttf"],
    },
    FontFamily {
        name: "Cascadia Mono",
        regular: &["CascadiaMono.ttf"],
        bold: &["CascadiaMono-Bold.ttf"],
        italic: &["CascadiaMono-Italic.ttf"],
        bold_italic: &["CascadiaMono-BoldItalic.ttf"],
    },
    FontFamily {
        name: "Consolas",
        regular: &["consola.ttf"],
        bold: &["consolab.ttf"],
        italic: &["consolai.ttf"],
        bold_italic: &["consolaz.ttf"],
    },
    FontFamily {
        name: "Menlo",
        regular: &["Menlo.ttc"],
        bold: &[],
        italic: &[],
        bold_italic: &[],
    },
];

/// Fallback fonts for code points the primary font lacks.
const FALLBACK_FONT_NAMES: &[&str] = &[
    "NotoSansMono-Regular.ttf",
    "NotoSansSymbols2-Regular.ttf",
    "NotoSansCJK-Regular.ttc",
    "DejaVuSans.ttf",
    "seguisym.ttf",
    "msgothic.ttc",
];

/// Family names that mean "any monospace font".
const GENERIC_MONOSPACE: &[&str] = &["", "monospace", "mono"];

const STYLE_SUFFIXES: [&str; 4] = ["Regular", "Bold", "Italic", "BoldItalic"];

fn platform_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let home = std::env::var_os("HOME").map(PathBuf::from);
    if cfg!(target_os = "windows") {
        let root = std::env::var_os("WINDIR")
            .map_or_else(|| PathBuf::from(r"C:\Windows"), PathBuf::from);
        dirs.push(root.join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join(r"Microsoft\Windows\Fonts"));
        }
    } else if cfg!(target_os = "macos") {
        if let Some(home) = home {
            dirs.push(home.join("Library/Fonts"));
        }
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
    } else {
        if let Some(home) = home {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
    }
    dirs
}

/// Filename → full path index of every font file found on the system.
#[derive(Debug, Clone, Default)]
pub struct FontIndex {
    files: HashMap<String, PathBuf>,
}

impl FontIndex {
    /// Scan the platform font directories.
    pub fn scan() -> Self {
        Self::from_dirs(&platform_font_dirs())
    }

    /// Scan the given directories recursively. The first file seen for a
    /// given filename wins.
    pub fn from_dirs(dirs: &[PathBuf]) -> Self {
        let mut files = HashMap::new();
        for dir in dirs {
            index_font_dir(dir, &mut files);
        }
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn find(&self, names: &[&str]) -> Option<PathBuf> {
        names.iter().find_map(|name| self.files.get(*name).cloned())
    }

    /// Resolve the font file for `family` in `style`.
    ///
    /// Missing style variants fall back to the family's regular file (the
    /// style set's width check then sees identical widths). Absolute paths
    /// are used as-is for every style.
    pub fn resolve(&self, family: &str, style: FontStyle) -> Option<PathBuf> {
        let path = Path::new(family);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        let lowered = family.trim().to_ascii_lowercase();
        if GENERIC_MONOSPACE.contains(&lowered.as_str()) {
            return FONT_FAMILIES
                .iter()
                .find_map(|fam| self.resolve_known(fam, style));
        }

        if let Some(fam) = FONT_FAMILIES
            .iter()
            .find(|fam| fam.name.eq_ignore_ascii_case(family.trim()))
        {
            if let Some(path) = self.resolve_known(fam, style) {
                return Some(path);
            }
        }

        self.resolve_guessed(family, style)
    }

    fn resolve_known(&self, family: &FontFamily, style: FontStyle) -> Option<PathBuf> {
        self.find(family.candidates(style))
            .or_else(|| self.find(family.regular))
    }

    /// Try `FamilyName-Style.{ttf,otf}` and, for regular, `FamilyName.{ttf,otf}`.
    fn resolve_guessed(&self, family: &str, style: FontStyle) -> Option<PathBuf> {
        let compact: String = family.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return None;
        }
        let guesses = |suffix: &str| {
            ["ttf", "otf", "ttc"]
                .iter()
                .map(|ext| format!("{compact}-{suffix}.{ext}"))
                .collect::<Vec<_>>()
        };
        let styled = guesses(STYLE_SUFFIXES[style.index()]);
        let mut regular = guesses(STYLE_SUFFIXES[0]);
        regular.extend(["ttf", "otf", "ttc"].iter().map(|ext| format!("{compact}.{ext}")));

        let lookup = |names: &[String]| names.iter().find_map(|n| self.files.get(n).cloned());
        lookup(&styled).or_else(|| lookup(&regular))
    }

    /// Fallback font files present on this system, in priority order.
    pub fn fallback_paths(&self) -> Vec<PathBuf> {
        FALLBACK_FONT_NAMES
            .iter()
            .filter_map(|name| self.files.get(*name).cloned())
            .collect()
    }
}

fn index_font_dir(dir: &Path, index: &mut HashMap<String, PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            index_font_dir(&path, index);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            index.entry(name.to_owned()).or_insert(path);
        } else {
            // Non-UTF-8 filename, skip.
        }
    }
}
