//! The `init` command: collect what is needed to scaffold a new project.
//!
//! Rendering the chosen template is left to the template itself; this
//! command stops once the project metadata is known.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Result, StencilError};
use crate::ui::{Prompt, PromptOption, UserInterface};

use super::{CommandImpl, DispatchArgs};

const BUILTIN_TEMPLATES: &str = include_str!("templates.yml");

/// Version suggested for a new project.
pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";

static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+([-][a-zA-Z][a-zA-Z0-9]*|[_][a-zA-Z][a-zA-Z0-9]*|[a-zA-Z0-9])*$")
        .expect("PROJECT_NAME must compile")
});

/// Whether `name` can be used as a project name.
///
/// Names start with a letter; `-` and `_` must be followed by a letter.
pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME.is_match(name)
}

fn validate_project_name(name: &str) -> std::result::Result<(), String> {
    if is_valid_project_name(name) {
        Ok(())
    } else {
        Err("Please enter a valid name: a letter first, then letters, digits, or - and _ followed by a letter".to_string())
    }
}

/// Canonical form of a version string, if it is valid semver.
///
/// A leading `v` or `=` is accepted and dropped.
pub fn normalize_version(version: &str) -> Option<String> {
    let trimmed = version.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('='))
        .unwrap_or(trimmed);
    semver::Version::parse(bare).ok().map(|v| v.to_string())
}

/// Class name of a project: each uppercase letter becomes `-` plus its
/// lowercase form, and one leading `-` is dropped.
///
/// Only case boundaries split words, so `my_app` stays `my_app`.
pub fn class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    match out.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

fn validate_version(version: &str) -> std::result::Result<(), String> {
    match normalize_version(version) {
        Some(_) => Ok(()),
        None => Err("Please enter a valid version, for example 1.0.0".to_string()),
    }
}

/// What is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// A standalone project.
    Project,
    /// A reusable component.
    Component,
}

impl ProjectKind {
    /// Tag value used by templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "project" => Some(Self::Project),
            "component" => Some(Self::Component),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A published template a project can start from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectTemplate {
    /// Display name.
    pub name: String,
    /// Artifact name in the registry.
    pub npm_name: String,
    /// Template version.
    pub version: String,
    /// Template flavor.
    #[serde(default)]
    pub kind: Option<String>,
    /// Command that installs the generated project's dependencies.
    #[serde(default)]
    pub install_command: Option<String>,
    /// Command that starts the generated project.
    #[serde(default)]
    pub start_command: Option<String>,
    /// Which [`ProjectKind`]s the template serves.
    #[serde(default)]
    pub tag: Vec<String>,
    /// Globs the renderer leaves untouched.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl ProjectTemplate {
    /// The templates that ship with Stencil.
    pub fn builtin() -> Result<Vec<Self>> {
        serde_yaml::from_str(BUILTIN_TEMPLATES)
            .map_err(|e| anyhow::anyhow!("built-in templates are invalid: {}", e).into())
    }

    /// Whether the template serves `kind`.
    pub fn serves(&self, kind: ProjectKind) -> bool {
        self.tag.iter().any(|t| t == kind.as_str())
    }
}

/// Everything collected by `init`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInfo {
    /// Project or component.
    pub kind: ProjectKind,
    /// Name as entered.
    pub name: String,
    /// Normalized semantic version.
    pub version: String,
    /// Artifact name of the chosen template.
    pub template: String,
    /// Kebab-case form of the name.
    pub class_name: String,
}

/// Whether `dir` holds anything besides dotfiles and `node_modules`.
pub fn is_dir_empty(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with('.') && name != "node_modules" {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Remove everything inside `dir`, keeping `dir` itself.
pub fn empty_dir(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// The `init` command implementation.
#[derive(Debug)]
pub struct InitCommand {
    cwd: PathBuf,
    templates: Vec<ProjectTemplate>,
    project_name: String,
    force: bool,
    project_info: Option<ProjectInfo>,
}

impl InitCommand {
    /// Create the command for `cwd` with the built-in templates.
    pub fn new(cwd: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_templates(cwd, ProjectTemplate::builtin()?))
    }

    /// Create the command with a custom template list.
    pub fn with_templates(cwd: impl Into<PathBuf>, templates: Vec<ProjectTemplate>) -> Self {
        Self {
            cwd: cwd.into(),
            templates,
            project_name: String::new(),
            force: false,
            project_info: None,
        }
    }

    /// What the last `exec` collected, if it ran to completion.
    pub fn project_info(&self) -> Option<&ProjectInfo> {
        self.project_info.as_ref()
    }

    /// Ask everything needed to create the project.
    ///
    /// Returns `None` when the user chose not to continue in a non-empty
    /// directory.
    pub fn prepare(&mut self, ui: &mut dyn UserInterface) -> Result<Option<ProjectInfo>> {
        if self.templates.is_empty() {
            return Err(StencilError::NoTemplates);
        }

        if !is_dir_empty(&self.cwd)? {
            if !self.force {
                let go_on = ui
                    .prompt(&Prompt::confirm(
                        "continue",
                        "The current directory is not empty. Continue creating the project?",
                        false,
                    ))?
                    .as_bool()
                    .unwrap_or(false);
                if !go_on {
                    return Ok(None);
                }
            }

            let confirm_delete = ui
                .prompt(&Prompt::confirm(
                    "confirm_delete",
                    "Remove all files in the current directory?",
                    false,
                ))?
                .as_bool()
                .unwrap_or(false);
            if confirm_delete {
                tracing::debug!("Emptying {}", self.cwd.display());
                empty_dir(&self.cwd)?;
            }
        }

        let kind = self.ask_kind(ui)?;
        let templates: Vec<&ProjectTemplate> =
            self.templates.iter().filter(|t| t.serves(kind)).collect();
        if templates.is_empty() {
            return Err(StencilError::NoTemplates);
        }

        let name = if is_valid_project_name(&self.project_name) {
            self.project_name.clone()
        } else {
            ui.prompt(
                &Prompt::input("name", &format!("Enter the {} name", kind))
                    .with_validator(validate_project_name),
            )?
            .as_string()
        };

        let entered_version = ui
            .prompt(
                &Prompt::input("version", &format!("Enter the {} version", kind))
                    .with_default(DEFAULT_PROJECT_VERSION)
                    .with_validator(validate_version),
            )?
            .as_string();
        let version = normalize_version(&entered_version).ok_or_else(|| {
            StencilError::InvalidArguments {
                message: format!("invalid version '{}'", entered_version),
            }
        })?;

        let options = templates
            .iter()
            .map(|t| PromptOption::new(&t.name, &t.npm_name))
            .collect();
        let template = ui
            .prompt(
                &Prompt::select("template", &format!("Choose a {} template", kind), options)
                    .with_default(&templates[0].npm_name),
            )?
            .as_string();

        let class_name = class_name(&name);

        Ok(Some(ProjectInfo {
            kind,
            name,
            version,
            template,
            class_name,
        }))
    }

    fn ask_kind(&self, ui: &mut dyn UserInterface) -> Result<ProjectKind> {
        let answer = ui
            .prompt(
                &Prompt::select(
                    "kind",
                    "What do you want to create?",
                    vec![
                        PromptOption::new("Project", ProjectKind::Project.as_str()),
                        PromptOption::new("Component", ProjectKind::Component.as_str()),
                    ],
                )
                .with_default(ProjectKind::Project.as_str()),
            )?
            .as_string();

        ProjectKind::parse(&answer).ok_or_else(|| StencilError::InvalidArguments {
            message: format!("unknown kind '{}'", answer),
        })
    }
}

impl CommandImpl for InitCommand {
    fn init(&mut self, args: &DispatchArgs) -> Result<()> {
        self.project_name = args.positional.first().cloned().unwrap_or_default();
        self.force = args.flag("force");
        Ok(())
    }

    fn exec(&mut self, ui: &mut dyn UserInterface) -> Result<()> {
        match self.prepare(ui)? {
            Some(info) => {
                tracing::debug!("Project info: {:?}", info);
                ui.success(&format!(
                    "{} {}@{} will use {}",
                    info.kind, info.name, info.version, info.template
                ));
                self.project_info = Some(info);
            }
            None => tracing::debug!("Init cancelled in non-empty directory"),
        }
        Ok(())
    }
}
