use super::literal::{include_guard, include_line, value_literal};
use super::{Codegen, RenderContext, BANNER};
use crate::validate::storage_range;

fn needs_cstdint(storage: &str) -> bool {
    let bare = storage.trim();
    bare.ends_with("_t") && storage_range(bare).is_some()
}

pub(crate) fn emit_header(cg: &mut Codegen, ctx: &RenderContext<'_>) {
    let def = ctx.definition;
    let name = ctx.name();
    let guard = include_guard(&def.scope, name, &ctx.options.header_extension);
    let error_name = ctx.lookup_error_name();

    cg.line(BANNER);
    cg.blank();
    cg.line(format!("#ifndef {guard}"));
    cg.line(format!("#define {guard}"));
    cg.blank();

    // required, then caller supplied
    if def.storage.as_deref().is_some_and(needs_cstdint) {
        cg.line("#include <cstdint>");
    }
    cg.line("#include <iosfwd>");
    cg.line("#include <stdexcept>");
    cg.line("#include <string>");
    if !def.interface_includes.is_empty() {
        cg.blank();
        for include in &def.interface_includes {
            cg.line(include_line(include));
        }
    }
    cg.blank();

    cg.namespace_open(&def.scope);

    let head = match def.storage.as_deref() {
        Some(storage) => format!("enum class {name} : {}", storage.trim()),
        None => format!("enum class {name}"),
    };
    cg.block(head, "};", |cg| {
        cg.list(ctx.tables.declaration.iter().map(|v| format!("{} = {}", v.name, value_literal(&v.value))));
    });
    cg.blank();

    cg.block(format!("class {error_name} : public std::invalid_argument"), "};", |cg| {
        cg.label("public:");
        cg.line(format!("explicit {error_name}(std::string const & name);"));
        cg.line("std::string const & name() const;");
        cg.blank();
        cg.label("private:");
        cg.line("std::string name_;");
    });
    cg.blank();

    // primary template is only declared; each enum adds its specialization
    cg.line("template <typename Enum>");
    cg.line("Enum name_to_value(std::string const & name);");
    cg.blank();
    cg.line("template <>");
    cg.line(format!("{name} name_to_value<{name}>(std::string const & name);"));
    cg.blank();
    cg.line(format!("std::string const & value_to_name({name} value);"));
    cg.blank();

    if let Some(code) = def.interface_code.as_deref() {
        cg.verbatim(code);
        cg.blank();
    }

    cg.line(format!("std::ostream & operator<<(std::ostream & os, {name} value);"));
    cg.line(format!("std::istream & operator>>(std::istream & is, {name} & value);"));
    cg.blank();

    if !def.scope.is_empty() {
        cg.namespace_close(&def.scope);
        cg.blank();
    }
    cg.line(format!("#endif // {guard}"));
}
