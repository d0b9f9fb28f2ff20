// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// Every section is optional; the defaults reproduce the conventional site
/// layout, so a project that follows it needs no config file at all:
///
/// ```toml
/// [source]
/// root = "app"
/// styles = "assets/scss"
///
/// [dest]
/// root = "dist"
/// preserve = ["assets/img"]
///
/// [server]
/// port = 8080
/// ```
///
/// All paths are relative: section entries relative to their root, roots
/// relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Source tree layout from `[source]`.
    #[serde(default)]
    pub source: SourceSection,

    /// Destination tree layout from `[dest]`.
    #[serde(default)]
    pub dest: DestSection,

    /// Reload server settings from `[server]`.
    #[serde(default)]
    pub server: ServerSection,

    /// Browser-support targets from `[browsers]`, used by the production
    /// stylesheet pass.
    #[serde(default)]
    pub browsers: BrowserSection,

    /// Directory holding the image transform cache.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: SourceSection::default(),
            dest: DestSection::default(),
            server: ServerSection::default(),
            browsers: BrowserSection::default(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl SiteConfig {
    pub fn source_root(&self) -> PathBuf {
        PathBuf::from(&self.source.root)
    }

    pub fn dest_root(&self) -> PathBuf {
        PathBuf::from(&self.dest.root)
    }

    pub fn styles_dir(&self) -> PathBuf {
        self.source_root().join(&self.source.styles)
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.source_root().join(&self.source.pages)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.source_root().join(&self.source.templates)
    }

    pub fn data_file(&self) -> PathBuf {
        self.source_root().join(&self.source.data)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.source_root().join(&self.source.images)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.source_root().join(&self.source.fonts)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.source_root().join(&self.source.scripts)
    }

    pub fn styles_out_dir(&self) -> PathBuf {
        self.dest_root().join(&self.dest.styles)
    }

    pub fn images_out_dir(&self) -> PathBuf {
        self.dest_root().join(&self.dest.images)
    }

    pub fn fonts_out_dir(&self) -> PathBuf {
        self.dest_root().join(&self.dest.fonts)
    }

    pub fn scripts_out_dir(&self) -> PathBuf {
        self.dest_root().join(&self.dest.scripts)
    }

    pub fn image_cache_file(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir).join("imagecache")
    }
}

/// `[source]` section: where each asset category lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSection {
    #[serde(default = "default_source_root")]
    pub root: String,

    /// Stylesheet sources (`**/*.scss` below this).
    #[serde(default = "default_source_styles")]
    pub styles: String,

    /// Page templates (`**/*.html` below this), one output page each.
    #[serde(default = "default_source_pages")]
    pub pages: String,

    /// Shared template include/extends search path.
    #[serde(default = "default_source_templates")]
    pub templates: String,

    /// JSON document supplying template variables, read fresh on each run.
    #[serde(default = "default_source_data")]
    pub data: String,

    #[serde(default = "default_source_images")]
    pub images: String,

    #[serde(default = "default_source_fonts")]
    pub fonts: String,

    #[serde(default = "default_source_scripts")]
    pub scripts: String,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            root: default_source_root(),
            styles: default_source_styles(),
            pages: default_source_pages(),
            templates: default_source_templates(),
            data: default_source_data(),
            images: default_source_images(),
            fonts: default_source_fonts(),
            scripts: default_source_scripts(),
        }
    }
}

/// `[dest]` section: output tree layout.
///
/// `preserve` lists subpaths of the destination root that `clean:dist`
/// leaves untouched (the processed-image cache subtree survives rebuilds).
#[derive(Debug, Clone, Deserialize)]
pub struct DestSection {
    #[serde(default = "default_dest_root")]
    pub root: String,

    #[serde(default = "default_dest_styles")]
    pub styles: String,

    #[serde(default = "default_dest_images")]
    pub images: String,

    #[serde(default = "default_dest_fonts")]
    pub fonts: String,

    #[serde(default = "default_dest_scripts")]
    pub scripts: String,

    #[serde(default = "default_dest_preserve")]
    pub preserve: Vec<String>,
}

impl Default for DestSection {
    fn default() -> Self {
        Self {
            root: default_dest_root(),
            styles: default_dest_styles(),
            images: default_dest_images(),
            fonts: default_dest_fonts(),
            scripts: default_dest_scripts(),
            preserve: default_dest_preserve(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// `[browsers]` section: browserslist queries fed to the production
/// stylesheet pass.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSection {
    #[serde(default = "default_browser_targets")]
    pub targets: Vec<String>,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            targets: default_browser_targets(),
        }
    }
}

fn default_source_root() -> String {
    "app".to_string()
}

fn default_source_styles() -> String {
    "assets/scss".to_string()
}

fn default_source_pages() -> String {
    "pages".to_string()
}

fn default_source_templates() -> String {
    "templates".to_string()
}

fn default_source_data() -> String {
    "data/data.json".to_string()
}

fn default_source_images() -> String {
    "assets/img".to_string()
}

fn default_source_fonts() -> String {
    "assets/fonts".to_string()
}

fn default_source_scripts() -> String {
    "assets/js".to_string()
}

fn default_dest_root() -> String {
    "dist".to_string()
}

fn default_dest_styles() -> String {
    "assets/css".to_string()
}

fn default_dest_images() -> String {
    "assets/img".to_string()
}

fn default_dest_fonts() -> String {
    "assets/fonts".to_string()
}

fn default_dest_scripts() -> String {
    "assets/js".to_string()
}

fn default_dest_preserve() -> Vec<String> {
    vec!["assets/img".to_string()]
}

fn default_port() -> u16 {
    8080
}

fn default_browser_targets() -> Vec<String> {
    [
        "last 2 versions",
        "safari >= 8",
        "ie >= 9",
        "ff >= 20",
        "ios 6",
        "android 4",
    ]
    .map(str::to_string)
    .to_vec()
}

fn default_cache_dir() -> String {
    ".sitepipe".to_string()
}
