use super::literal::include_line;
use super::{Codegen, RenderContext, BANNER};

pub(crate) fn emit_source(cg: &mut Codegen, ctx: &RenderContext<'_>) {
    let def = ctx.definition;

    cg.line(BANNER);
    cg.blank();
    cg.line(format!("#include \"{}\"", ctx.options.header_file(def.file_stem())));
    cg.blank();
    for required in ["<algorithm>", "<cstddef>", "<cstring>", "<istream>", "<iterator>", "<ostream>"] {
        cg.line(format!("#include {required}"));
    }
    if !def.implementation_includes.is_empty() {
        cg.blank();
        for include in &def.implementation_includes {
            cg.line(include_line(include));
        }
    }
    cg.blank();

    cg.namespace_open(&def.scope);

    emit_tables(cg, ctx);
    cg.blank();
    emit_lookup_error(cg, ctx);
    cg.blank();
    emit_name_to_value(cg, ctx);
    cg.blank();
    emit_value_to_name(cg, ctx);
    cg.blank();
    emit_stream_operators(cg, ctx);
    cg.blank();

    if let Some(code) = def.implementation_code.as_deref() {
        cg.verbatim(code);
        cg.blank();
    }

    cg.namespace_close(&def.scope);
}

/// Display names live in a function-local static so nothing depends on the
/// order static objects across translation units get initialized. The name
/// array holds only `char const *` and enumerators, which is constant
/// initialized.
///
/// Inside the helper namespace the enum is always spelled fully qualified:
/// an enum called `Entry` or `name_less` is hidden there by the helper.
fn emit_tables(cg: &mut Codegen, ctx: &RenderContext<'_>) {
    let name = ctx.name();
    let qualified = ctx.qualified_type();
    let count = ctx.tables.len();

    cg.line("namespace");
    cg.line("{");
    cg.block(format!("namespace {}", ctx.tables_namespace()), "}", |cg| {
        cg.block("std::string const & display_name(std::size_t index)", "}", |cg| {
            cg.line("static std::string const names[] =");
            cg.block("", "};", |cg| {
                cg.list(ctx.tables.declaration.iter().map(|v| format!("\"{}\"", v.name)));
            });
            cg.line(format!(
                "static_assert(sizeof(names) / sizeof(names[0]) == {count}, \"display names out of sync with {name}\");"
            ));
            cg.line("return names[index];");
        });
        cg.blank();

        cg.block("struct Entry", "};", |cg| {
            cg.line("char const * name;");
            cg.line(format!("{qualified} value;"));
        });
        cg.blank();

        cg.line("Entry const by_name[] =");
        cg.block("", "};", |cg| {
            cg.list(ctx.tables.by_name.iter().map(|v| format!("{{ \"{0}\", {qualified}::{0} }}", v.name)));
        });
        cg.line(format!(
            "static_assert(sizeof(by_name) / sizeof(by_name[0]) == {count}, \"name table out of sync with {name}\");"
        ));
        cg.blank();

        // the one ordering for names: sorts the table above and searches it
        cg.block("bool name_less(char const * lhs, char const * rhs)", "}", |cg| {
            cg.line("return std::strcmp(lhs, rhs) < 0;");
        });
    });
    cg.line("}");
}

fn emit_lookup_error(cg: &mut Codegen, ctx: &RenderContext<'_>) {
    let error_name = ctx.lookup_error_name();
    let qualified = ctx.definition.qualified_name();

    cg.line(format!("{error_name}::{error_name}(std::string const & name)"));
    cg.line(format!("  : std::invalid_argument(\"unknown {qualified} name: \" + name)"));
    cg.line("  , name_(name)");
    cg.line("{");
    cg.line("}");
    cg.blank();
    cg.block(format!("std::string const & {error_name}::name() const"), "}", |cg| {
        cg.line("return name_;");
    });
}

fn emit_name_to_value(cg: &mut Codegen, ctx: &RenderContext<'_>) {
    let name = ctx.name();
    let tables = ctx.tables_namespace();
    let error_name = ctx.lookup_error_name();

    cg.line("template <>");
    cg.block(format!("{name} name_to_value<{name}>(std::string const & name)"), "}", |cg| {
        cg.line(format!("{tables}::Entry const * first = std::begin({tables}::by_name);"));
        cg.line(format!("{tables}::Entry const * last = std::end({tables}::by_name);"));
        cg.line(format!("{tables}::Entry const * found = std::lower_bound("));
        cg.line("  first, last, name.c_str(),");
        cg.line(format!(
            "  []({tables}::Entry const & entry, char const * key) {{ return {tables}::name_less(entry.name, key); }});"
        ));
        cg.block(
            format!("if (found == last || {tables}::name_less(name.c_str(), found->name))"),
            "}",
            |cg| cg.line(format!("throw {error_name}(name);")),
        );
        cg.line("return found->value;");
    });
}

/// One `case` per constant and no `default`, so a compiler warning flags any
/// constant the switch misses. The trailing throw is only reachable for a
/// value cast from outside the declared set.
fn emit_value_to_name(cg: &mut Codegen, ctx: &RenderContext<'_>) {
    let name = ctx.name();
    let tables = ctx.tables_namespace();
    let qualified = ctx.definition.qualified_name();

    cg.block(format!("std::string const & value_to_name({name} value)"), "}", |cg| {
        cg.block("switch (value)", "}", |cg| {
            for (index, v) in ctx.tables.declaration.iter().enumerate() {
                cg.line(format!("case {name}::{}: return {tables}::display_name({index});", v.name));
            }
        });
        cg.line(format!("throw std::out_of_range(\"value_to_name: not a declared {qualified} constant\");"));
    });
}

fn emit_stream_operators(cg: &mut Codegen, ctx: &RenderContext<'_>) {
    let name = ctx.name();

    cg.block(format!("std::ostream & operator<<(std::ostream & os, {name} value)"), "}", |cg| {
        cg.line("return os << value_to_name(value);");
    });
    cg.blank();
    // lookup failures propagate as the enum's lookup error
    cg.block(format!("std::istream & operator>>(std::istream & is, {name} & value)"), "}", |cg| {
        cg.line("std::string token;");
        cg.block("if (is >> token)", "}", |cg| {
            cg.line(format!("value = name_to_value<{name}>(token);"));
        });
        cg.line("return is;");
    });
}
