/// Every known option with its values, in the order completions are offered.
pub(crate) const OPTIONS: &[(&str, &[&str])] = &[
    ("doctype", &["article", "book", "manpage", "inline"]),
    (
        "backend",
        &[
            "html5", "xhtml11", "docbook", "docbook5", "pdf", "latex", "manpage", "slidy",
            "revealjs",
        ],
    ),
    (
        "encoding",
        &["utf-8", "iso-8859-1", "windows-1252", "ascii", "utf-16", "utf-32"],
    ),
    (
        "language",
        &[
            "javascript",
            "typescript",
            "python",
            "java",
            "go",
            "rust",
            "cpp",
            "c",
            "csharp",
            "php",
            "ruby",
            "bash",
            "shell",
            "json",
            "xml",
            "yaml",
            "html",
            "css",
            "sql",
            "dockerfile",
            "markdown",
            "asciidoc",
        ],
    ),
    (
        "shell",
        &[
            "bash", "sh", "zsh", "fish", "csh", "tcsh", "ksh", "powershell", "cmd", "pwsh",
        ],
    ),
    ("icons", &["font", "image", "emoji", "none"]),
    ("frame", &["all", "none", "sides", "topbot"]),
    ("grid", &["all", "none", "rows", "cols"]),
    (
        "source-highlighter",
        &["highlight.js", "coderay", "pygments", "rouge", "prettify"],
    ),
    ("pdf-theme", &["default", "basic", "dark", "custom"]),
    ("sectnumlevels", &["0", "1", "2", "3", "4", "5"]),
    ("toc", &["auto", "left", "right", "macro", "preamble"]),
    ("toclevels", &["1", "2", "3", "4", "5"]),
    ("format", &["png", "jpg", "jpeg", "gif", "svg", "webp", "pdf"]),
    ("align", &["left", "center", "right", "justify"]),
    ("float", &["left", "right", "none"]),
    (
        "role",
        &[
            "lead",
            "small",
            "big",
            "underline",
            "overline",
            "line-through",
            "nobreak",
            "nowrap",
            "pre-wrap",
        ],
    ),
];

/// Source languages to rank first for a file extension.
pub(crate) const LANGUAGE_BY_EXTENSION: &[(&str, &[&str])] = &[
    (".js", &["javascript"]),
    (".ts", &["typescript"]),
    (".py", &["python"]),
    (".java", &["java"]),
    (".go", &["go"]),
    (".rs", &["rust"]),
    (".cpp", &["cpp"]),
    (".c", &["c"]),
    (".cs", &["csharp"]),
    (".php", &["php"]),
    (".rb", &["ruby"]),
    (".sh", &["bash", "shell"]),
    (".json", &["json"]),
    (".xml", &["xml"]),
    (".yml", &["yaml"]),
    (".yaml", &["yaml"]),
    (".html", &["html"]),
    (".css", &["css"]),
    (".sql", &["sql"]),
    (".md", &["markdown"]),
    (".adoc", &["asciidoc"]),
];

/// Backends ranked first in the `web` context.
pub(crate) const WEB_BACKENDS: &[&str] = &["html5", "xhtml11", "slidy", "revealjs"];
