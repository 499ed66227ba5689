//! Literal data baked into the catalog: package lists and generated files.
//!
//! File bodies are byte-exact constants. Generated projects must be
//! reproducible, so nothing here is computed from answers; the catalog only
//! picks which constant to use.

/// Packages added per feature
pub mod packages {
    /// Tailwind v3 still ships the `tailwindcss init` CLI
    pub const TAILWIND: &[&str] = &["tailwindcss@3", "postcss", "autoprefixer"];
    pub const BOOTSTRAP: &[&str] = &["bootstrap"];
    pub const SASS: &[&str] = &["sass"];

    pub const MATERIAL_UI: &[&str] = &["@mui/material", "@emotion/react", "@emotion/styled"];
    pub const CHAKRA_UI: &[&str] = &[
        "@chakra-ui/react",
        "@emotion/react",
        "@emotion/styled",
        "framer-motion",
    ];
    pub const DAISY_UI: &[&str] = &["daisyui"];
    pub const ANT_DESIGN: &[&str] = &["antd"];

    pub const REDUX: &[&str] = &["@reduxjs/toolkit", "react-redux"];
    pub const ZUSTAND: &[&str] = &["zustand"];
    pub const MOBX: &[&str] = &["mobx", "mobx-react"];

    pub const AXIOS: &[&str] = &["axios"];
    pub const REACT_ROUTER_DOM: &[&str] = &["react-router-dom@latest"];

    pub const FASTAPI: &[&str] = &["fastapi", "uvicorn"];
    pub const FLASK: &[&str] = &["flask"];
}

/// Run inside the new project after the Tailwind packages are installed
pub const TAILWIND_INIT: &str = "tailwindcss init -p";

/// Acknowledgement for features that need no install
pub const FETCH_API_NOTICE: &str = "echo 'Fetch API is built-in, no need to install.'";

pub const TAILWIND_CONFIG_PATH: &str = "tailwind.config.js";

/// Stylesheet that receives the Tailwind directives (React templates)
pub const REACT_STYLESHEET_PATH: &str = "src/index.css";

/// Stylesheet that receives the Tailwind directives (Svelte template)
pub const SVELTE_STYLESHEET_PATH: &str = "src/app.css";

pub const TAILWIND_DIRECTIVES: &str = "@tailwind base;
@tailwind components;
@tailwind utilities;
";

/// create-react-app projects are CommonJS
pub const TAILWIND_CONFIG_CJS: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: [
    "./src/**/*.{js,jsx,ts,tsx}",
  ],
  theme: {
    extend: {},
  },
  plugins: [],
};
"#;

pub const TAILWIND_CONFIG_CJS_DAISYUI: &str = r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: [
    "./src/**/*.{js,jsx,ts,tsx}",
  ],
  theme: {
    extend: {},
  },
  plugins: [require("daisyui")],
};
"#;

/// Vite templates declare `"type": "module"`
pub const TAILWIND_CONFIG_ESM: &str = r#"/** @type {import('tailwindcss').Config} */
export default {
  content: [
    "./index.html",
    "./src/**/*.{js,jsx,ts,tsx,svelte}",
  ],
  theme: {
    extend: {},
  },
  plugins: [],
};
"#;

pub const TAILWIND_CONFIG_ESM_DAISYUI: &str = r#"import daisyui from "daisyui";

/** @type {import('tailwindcss').Config} */
export default {
  content: [
    "./index.html",
    "./src/**/*.{js,jsx,ts,tsx,svelte}",
  ],
  theme: {
    extend: {},
  },
  plugins: [daisyui],
};
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_are_three_lines() {
        let lines: Vec<&str> = TAILWIND_DIRECTIVES.lines().collect();
        assert_eq!(
            lines,
            ["@tailwind base;", "@tailwind components;", "@tailwind utilities;"]
        );
    }

    #[test]
    fn test_daisyui_variants_register_plugin() {
        assert!(TAILWIND_CONFIG_CJS_DAISYUI.contains(r#"require("daisyui")"#));
        assert!(TAILWIND_CONFIG_ESM_DAISYUI.contains("plugins: [daisyui]"));
        assert!(TAILWIND_CONFIG_CJS.contains("plugins: []"));
        assert!(TAILWIND_CONFIG_ESM.contains("plugins: []"));
    }

    #[test]
    fn test_configs_share_skeleton() {
        for config in [
            TAILWIND_CONFIG_CJS,
            TAILWIND_CONFIG_CJS_DAISYUI,
            TAILWIND_CONFIG_ESM,
            TAILWIND_CONFIG_ESM_DAISYUI,
        ] {
            assert!(config.contains("content: ["));
            assert!(config.contains("theme: {"));
            assert!(config.contains("extend: {},"));
            assert!(config.contains("plugins: ["));
        }
    }
}
