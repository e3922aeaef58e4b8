//! Built-in feature prompt modules
//!
//! Each module adds one entry to the feature checklist, the follow-up questions for that
//! feature, and a callback that turns the answers into plugin entries of the manual preset.

use creator_core::prompt::PromptModule;
use creator_core::{Answers, Choice, PluginOptions, Preset, PromptModuleApi, Question};
use serde_json::Value;

/// Every built-in module, in checklist order
pub const PROMPT_MODULES: &[PromptModule] = &[
    vue_version, babel, typescript, pwa, router, vuex, css_preprocessors, linter, unit,
];

fn plugin(id: &str) -> String {
    format!("@vue/cli-plugin-{}", id)
}

fn is_vue2(answers: &Answers) -> bool {
    answers.get_str("vueVersion") == Some("2")
}

pub fn vue_version(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("Choose Vue version", "vueVersion")
            .description("Choose a version of Vue.js that you want to start the project with")
            .checked(true),
    );

    api.inject_prompt(
        Question::list(
            "vueVersion",
            "Choose a version of Vue.js that you want to start the project with",
        )
        .when(|a| a.has_feature("vueVersion"))
        .choice(Choice::new("3.x", "3"))
        .choice(Choice::new("2.x", "2"))
        .default("3"),
    );

    api.on_prompt_complete(|answers, preset| {
        if let Some(version) = answers.get_str("vueVersion") {
            preset.vue_version = Some(version.to_string());
        }
    });
}

pub fn babel(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("Babel", "babel")
            .short("Babel")
            .description("Transpile modern JavaScript to older versions (for compatibility)")
            .link("https://babeljs.io/")
            .checked(true),
    );

    api.on_prompt_complete(|answers, preset| {
        let wanted = if answers.has_feature("ts") {
            answers.is_truthy("useTsWithBabel")
        } else {
            answers.has_feature("babel")
        };
        if wanted {
            preset.plugins.insert(plugin("babel"), PluginOptions::new());
        }
    });
}

pub fn typescript(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("TypeScript", "ts")
            .short("TS")
            .description("Add support for the TypeScript language")
            .link("https://github.com/vuejs/vue-cli/tree/dev/packages/%40vue/cli-plugin-typescript"),
    );

    api.inject_prompt(
        Question::confirm("tsClassComponent", "Use class-style component syntax?")
            .description("Use the @Component decorator on classes.")
            .when(|a| a.has_feature("ts") && is_vue2(a))
            .default(true),
    );

    api.inject_prompt(
        Question::confirm(
            "useTsWithBabel",
            "Use Babel alongside TypeScript (required for modern mode, auto-detected polyfills, transpiling JSX)?",
        )
        .description("It will output ES2015 and delegate the rest to Babel for auto polyfill based on browser targets.")
        .when(|a| a.has_feature("ts"))
        .default(true),
    );

    api.on_prompt_complete(|answers, preset| {
        if !answers.has_feature("ts") {
            return;
        }
        let mut options = PluginOptions::new();
        if answers.is_truthy("tsClassComponent") {
            options.insert("classComponent", true);
        }
        if answers.is_truthy("useTsWithBabel") {
            options.insert("useTsWithBabel", true);
        }
        preset.plugins.insert(plugin("typescript"), options);
    });
}

pub fn pwa(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("Progressive Web App (PWA) Support", "pwa")
            .short("PWA")
            .description("Improve performances with features like Web manifest and Service workers")
            .link("https://cli.vuejs.org/core-plugins/pwa.html"),
    );

    api.on_prompt_complete(|answers, preset| {
        if answers.has_feature("pwa") {
            preset.plugins.insert(plugin("pwa"), PluginOptions::new());
        }
    });
}

pub fn router(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("Router", "router")
            .description("Structure the app with dynamic pages")
            .link("https://router.vuejs.org/"),
    );

    api.inject_prompt(
        Question::confirm(
            "historyMode",
            "Use history mode for router? (Requires proper server setup for index fallback in production)",
        )
        .description("By using the HTML5 History API, the URLs don't need the '#' character anymore.")
        .when(|a| a.has_feature("router")),
    );

    api.on_prompt_complete(|answers, preset| {
        if answers.has_feature("router") {
            preset.plugins.insert(
                plugin("router"),
                PluginOptions::new().with("historyMode", answers.is_truthy("historyMode")),
            );
        }
    });
}

pub fn vuex(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("Vuex", "vuex")
            .description("Manage the app state with a centralized store")
            .link("https://vuex.vuejs.org/"),
    );

    api.on_prompt_complete(|answers, preset| {
        if answers.has_feature("vuex") {
            preset.plugins.insert(plugin("vuex"), PluginOptions::new());
        }
    });
}

pub fn css_preprocessors(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("CSS Pre-processors", "css-preprocessor")
            .description("Add support for CSS pre-processors like Sass, Less or Stylus")
            .link("https://cli.vuejs.org/guide/css.html"),
    );

    api.inject_prompt(
        Question::list(
            "cssPreprocessor",
            "Pick a CSS pre-processor (PostCSS, Autoprefixer and CSS Modules are supported by default):",
        )
        .description("PostCSS, Autoprefixer and CSS Modules are supported by default.")
        .when(|a| a.has_feature("css-preprocessor"))
        .choice(Choice::new("Sass/SCSS (with dart-sass)", "dart-sass"))
        .choice(Choice::new("Less", "less"))
        .choice(Choice::new("Stylus", "stylus")),
    );

    api.on_prompt_complete(|answers, preset| {
        if !answers.has_feature("css-preprocessor") {
            return;
        }
        if let Some(css) = answers.get_str("cssPreprocessor") {
            preset.css_preprocessor = Some(css.to_string());
        }
    });
}

pub fn linter(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("Linter / Formatter", "linter")
            .short("Linter")
            .description("Check and enforce code quality with ESLint or Prettier")
            .link("https://github.com/vuejs/vue-cli/tree/dev/packages/%40vue/cli-plugin-eslint")
            .checked(true),
    );

    api.inject_prompt(
        Question::list("eslintConfig", "Pick a linter / formatter config:")
            .description("Checking code errors and enforcing an homogeoneous code style is recommended.")
            .when(|a| a.has_feature("linter"))
            .choice(Choice::new("ESLint with error prevention only", "base").short("Basic"))
            .choice(Choice::new("ESLint + Airbnb config", "airbnb").short("Airbnb"))
            .choice(Choice::new("ESLint + Standard config", "standard").short("Standard"))
            .choice(Choice::new("ESLint + Prettier", "prettier").short("Prettier")),
    );

    api.inject_prompt(
        Question::checkbox("lintOn", "Pick additional lint features:")
            .when(|a| a.has_feature("linter"))
            .choice(Choice::new("Lint on save", "save").checked(true))
            .choice(Choice::new("Lint and fix on commit", "commit")),
    );

    api.on_prompt_complete(|answers, preset| {
        if !answers.has_feature("linter") {
            return;
        }
        let config = answers.get_str("eslintConfig").unwrap_or("base");
        let lint_on: Vec<Value> = answers
            .get_list("lintOn")
            .into_iter()
            .map(Value::String)
            .collect();
        preset.plugins.insert(
            plugin("eslint"),
            PluginOptions::new()
                .with("config", config)
                .with("lintOn", lint_on),
        );
    });
}

pub fn unit(api: &mut PromptModuleApi) {
    api.inject_feature(
        Choice::new("Unit Testing", "unit")
            .short("Unit")
            .description("Add a Unit Testing solution like Jest or Mocha")
            .link("https://cli.vuejs.org/config/#unit-testing"),
    );

    api.inject_prompt(
        Question::list("unit", "Pick a unit testing solution:")
            .when(|a| a.has_feature("unit"))
            .choice(
                Choice::new("Jest", "jest")
                    .short("Jest")
                    .description("Easy to use with zero config, snapshot testing and rich assertions."),
            )
            .choice(
                Choice::new("Mocha + Chai", "mocha")
                    .short("Mocha")
                    .description("Flexible test runner with Chai assertions and webpack integration."),
            ),
    );

    api.on_prompt_complete(|answers, preset: &mut Preset| {
        if !answers.has_feature("unit") {
            return;
        }
        match answers.get_str("unit") {
            Some("mocha") => {
                preset.plugins.insert(plugin("unit-mocha"), PluginOptions::new());
            }
            _ => {
                preset.plugins.insert(plugin("unit-jest"), PluginOptions::new());
            }
        }
    });
}
