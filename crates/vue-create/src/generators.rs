//! Built-in plugin generators
//!
//! Minimal generators for the core service and the first-party plugins the built-in
//! presets use. Plugins without a registered generator still get installed; they just
//! render nothing at creation time.

use creator_core::{GeneratorApi, LogKind, PluginOptions, PluginRegistry};
use serde_json::{json, Map, Value};

pub const SERVICE_ID: &str = "@vue/cli-service";

fn vue_version(root_options: &Map<String, Value>) -> &str {
    root_options
        .get("vueVersion")
        .and_then(Value::as_str)
        .unwrap_or("3")
}

fn project_name(root_options: &Map<String, Value>) -> &str {
    root_options
        .get("projectName")
        .and_then(Value::as_str)
        .unwrap_or("app")
}

/// The registry of every built-in generator
pub fn registry() -> PluginRegistry {
    PluginRegistry::new()
        .generator(SERVICE_ID, service)
        .generator("@vue/cli-plugin-babel", babel)
        .generator("@vue/cli-plugin-eslint", eslint)
        .generator("@vue/cli-plugin-router", router)
        .generator("@vue/cli-plugin-vuex", vuex)
}

fn service(
    api: &mut GeneratorApi<'_>,
    _options: &PluginOptions,
    root_options: &Map<String, Value>,
) -> anyhow::Result<()> {
    let vue3 = vue_version(root_options) == "3";
    let name = project_name(root_options).to_string();
    let bare = root_options.get("bare").and_then(Value::as_bool).unwrap_or(false);

    let vue = if vue3 { "^3.2.13" } else { "^2.6.14" };
    api.extend_package(json!({
        "scripts": {
            "serve": "vue-cli-service serve",
            "build": "vue-cli-service build"
        },
        "dependencies": { "vue": vue },
        "browserslist": ["> 1%", "last 2 versions", "not dead"]
    }))?;
    if !vue3 {
        api.extend_package(json!({
            "devDependencies": { "vue-template-compiler": "^2.6.14" }
        }))?;
    }

    if let Some(css) = root_options.get("cssPreprocessor").and_then(Value::as_str) {
        let deps = match css {
            "less" => json!({ "less": "^4.0.0", "less-loader": "^8.0.0" }),
            "stylus" => json!({ "stylus": "^0.55.0", "stylus-loader": "^6.1.0" }),
            _ => json!({ "sass": "^1.32.7", "sass-loader": "^12.0.0" }),
        };
        api.extend_package(json!({ "devDependencies": deps }))?;
    }

    api.render(
        ".gitignore",
        ".DS_Store\nnode_modules\n/dist\n\n# local env files\n.env.local\n.env.*.local\n",
    )?;
    api.render(
        "public/index.html",
        format!(
            "<!DOCTYPE html>\n<html lang=\"\">\n  <head>\n    <meta charset=\"utf-8\">\n    \
             <title>{}</title>\n  </head>\n  <body>\n    <div id=\"app\"></div>\n  </body>\n</html>\n",
            name
        ),
    )?;

    let main = if vue3 {
        "import { createApp } from 'vue'\nimport App from './App.vue'\n\ncreateApp(App).mount('#app')\n"
    } else {
        "import Vue from 'vue'\nimport App from './App.vue'\n\nVue.config.productionTip = false\n\n\
         new Vue({\n  render: h => h(App),\n}).$mount('#app')\n"
    };
    api.render("src/main.js", main)?;

    let app = if bare {
        "<template>\n  <div id=\"app\"></div>\n</template>\n".to_string()
    } else {
        format!(
            "<template>\n  <h1>Welcome to {}</h1>\n</template>\n\n<script>\nexport default {{\n  name: 'App'\n}}\n</script>\n",
            name
        )
    };
    api.render("src/App.vue", app)?;
    Ok(())
}

fn babel(
    api: &mut GeneratorApi<'_>,
    _options: &PluginOptions,
    _root_options: &Map<String, Value>,
) -> anyhow::Result<()> {
    api.extend_package(json!({
        "babel": { "presets": ["@vue/cli-plugin-babel/preset"] },
        "devDependencies": { "@babel/core": "^7.12.16" }
    }))?;
    Ok(())
}

fn eslint(
    api: &mut GeneratorApi<'_>,
    options: &PluginOptions,
    root_options: &Map<String, Value>,
) -> anyhow::Result<()> {
    let config = options.get("config").and_then(Value::as_str).unwrap_or("base");
    let vue_rules = if vue_version(root_options) == "3" {
        "plugin:vue/vue3-essential"
    } else {
        "plugin:vue/essential"
    };
    let mut extends = vec![vue_rules.to_string(), "eslint:recommended".to_string()];
    let mut dev_dependencies = json!({ "eslint": "^7.32.0", "eslint-plugin-vue": "^8.0.3" });
    match config {
        "airbnb" => {
            extends.push("@vue/airbnb".to_string());
            dev_dependencies["@vue/eslint-config-airbnb"] = json!("^6.0.0");
        }
        "standard" => {
            extends.push("@vue/standard".to_string());
            dev_dependencies["@vue/eslint-config-standard"] = json!("^6.1.0");
        }
        "prettier" => {
            extends.push("plugin:prettier/recommended".to_string());
            dev_dependencies["prettier"] = json!("^2.4.1");
            dev_dependencies["eslint-plugin-prettier"] = json!("^4.0.0");
        }
        _ => {}
    }
    if api.has_plugin("babel") {
        dev_dependencies["@babel/eslint-parser"] = json!("^7.12.16");
    }

    api.extend_package(json!({
        "scripts": { "lint": "vue-cli-service lint" },
        "eslintConfig": {
            "root": true,
            "env": { "node": true },
            "extends": extends
        },
        "devDependencies": dev_dependencies
    }))?;

    let lint_on_commit = options
        .get("lintOn")
        .and_then(Value::as_array)
        .is_some_and(|on| on.iter().any(|v| v == "commit"));
    if lint_on_commit {
        api.extend_package(json!({
            "gitHooks": { "pre-commit": "lint-staged" },
            "lint-staged": { "*.{js,jsx,vue}": "vue-cli-service lint" },
            "devDependencies": { "lint-staged": "^11.1.2", "yorkie": "^2.0.0" }
        }))?;
    }

    if config != "base" {
        api.exit_log(
            "Run the lint script once dependencies are installed to apply the selected style.",
            LogKind::Info,
        );
    }
    Ok(())
}

fn router(
    api: &mut GeneratorApi<'_>,
    options: &PluginOptions,
    root_options: &Map<String, Value>,
) -> anyhow::Result<()> {
    let history = options
        .get("historyMode")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let vue3 = vue_version(root_options) == "3";

    let vue_router = if vue3 { "^4.0.3" } else { "^3.5.1" };
    api.extend_package(json!({ "dependencies": { "vue-router": vue_router } }))?;

    let source = if vue3 {
        let history_fn = if history { "createWebHistory" } else { "createWebHashHistory" };
        format!(
            "import {{ createRouter, {0} }} from 'vue-router'\n\n\
             const routes = []\n\n\
             const router = createRouter({{\n  history: {0}(process.env.BASE_URL),\n  routes\n}})\n\n\
             export default router\n",
            history_fn
        )
    } else {
        let mode = if history { "\n  mode: 'history'," } else { "" };
        format!(
            "import Vue from 'vue'\nimport VueRouter from 'vue-router'\n\n\
             Vue.use(VueRouter)\n\n\
             const routes = []\n\n\
             const router = new VueRouter({{{}\n  base: process.env.BASE_URL,\n  routes\n}})\n\n\
             export default router\n",
            mode
        )
    };
    api.render("src/router/index.js", source)?;
    Ok(())
}

fn vuex(
    api: &mut GeneratorApi<'_>,
    _options: &PluginOptions,
    root_options: &Map<String, Value>,
) -> anyhow::Result<()> {
    let vue3 = vue_version(root_options) == "3";
    let store = if vue3 { "^4.0.0" } else { "^3.6.2" };
    api.extend_package(json!({ "dependencies": { "vuex": store } }))?;

    let source = if vue3 {
        "import { createStore } from 'vuex'\n\n\
         export default createStore({\n  state: {},\n  getters: {},\n  mutations: {},\n  actions: {},\n  modules: {}\n})\n"
    } else {
        "import Vue from 'vue'\nimport Vuex from 'vuex'\n\nVue.use(Vuex)\n\n\
         export default new Vuex.Store({\n  state: {},\n  getters: {},\n  mutations: {},\n  actions: {},\n  modules: {}\n})\n"
    };
    api.render("src/store/index.js", source)?;
    Ok(())
}
