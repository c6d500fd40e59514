//! AST visitor for code formatting

use till_runtime::ast::*;

use crate::formatter::FormatConfig;

/// Binding strength of unary operators
const UNARY_PRECEDENCE: u8 = 5;
/// Binding strength of literals, names, calls and groups
const PRIMARY_PRECEDENCE: u8 = 6;

/// AST visitor that produces formatted source code
pub struct FormatVisitor {
    /// Output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Formatter configuration
    config: FormatConfig,
}

impl FormatVisitor {
    pub fn new(config: FormatConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            config,
        }
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// Write indentation at current level
    fn write_indent(&mut self) {
        let spaces = " ".repeat(self.indent_level * self.config.indent_size);
        self.output.push_str(&spaces);
    }

    /// Write a string to output
    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Write a newline
    fn writeln(&mut self) {
        self.output.push('\n');
    }

    // === Statements ===

    pub fn visit_program(&mut self, program: &Program) {
        self.visit_statements(&program.statements);
    }

    /// Function declarations are separated from their neighbours by a blank line
    fn visit_statements(&mut self, statements: &[Stmt]) {
        for (i, stmt) in statements.iter().enumerate() {
            if i > 0 {
                let prev = &statements[i - 1];
                if matches!(stmt, Stmt::FunctionDecl(_)) || matches!(prev, Stmt::FunctionDecl(_))
                {
                    self.writeln();
                }
            }
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::VarDecl(v) => {
                self.write(&v.type_ref.name);
                self.write(" ");
                self.write(&v.name.name);
                if let Some(init) = &v.init {
                    self.write(" = ");
                    self.visit_expr(init);
                }
                self.writeln();
            }
            Stmt::Assign(a) => {
                self.write(&a.target.name);
                self.write(" = ");
                self.visit_expr(&a.value);
                self.writeln();
            }
            Stmt::If(i) => {
                self.write("if ");
                self.visit_expr(&i.cond);
                self.visit_block(&i.body);
            }
            Stmt::While(w) => {
                self.write("while ");
                self.visit_expr(&w.cond);
                self.visit_block(&w.body);
            }
            Stmt::FunctionDecl(f) => self.visit_function_decl(f),
            Stmt::Return(r) => {
                self.write("return");
                if let Some(value) = &r.value {
                    self.write(" ");
                    self.visit_expr(value);
                }
                self.writeln();
            }
            Stmt::Display(d) => {
                self.write("display ");
                self.visit_expr(&d.value);
                self.writeln();
            }
        }
    }

    fn visit_function_decl(&mut self, f: &FunctionDecl) {
        self.write(&f.name.name);
        self.write("(");
        for (i, param) in f.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&param.type_ref.name);
            self.write(" ");
            self.write(&param.name.name);
        }
        self.write(")");
        if let Some(ret) = &f.return_type {
            self.write(" -> ");
            self.write(&ret.name);
        }
        self.visit_block(&f.body);
    }

    /// Ends the header line and writes the body one level deeper
    fn visit_block(&mut self, block: &Block) {
        self.writeln();
        self.indent_level += 1;
        self.visit_statements(&block.statements);
        self.indent_level -= 1;
    }

    // === Expressions ===

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit, _) => self.visit_literal(lit),
            Expr::Identifier(id) => self.write(&id.name),
            Expr::Unary(u) => {
                self.write(u.op.as_str());
                self.visit_operand(&u.expr, UNARY_PRECEDENCE, false);
            }
            Expr::Binary(b) => {
                let prec = b.op.precedence();
                self.visit_operand(&b.left, prec, false);
                self.write(" ");
                self.write(b.op.as_str());
                self.write(" ");
                // Every level is left-associative
                self.visit_operand(&b.right, prec, true);
            }
            Expr::Call(c) => {
                self.write(&c.callee.name);
                self.write("(");
                for (i, arg) in c.args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.visit_expr(arg);
                }
                self.write(")");
            }
            Expr::Group(g) => {
                self.write("(");
                self.visit_expr(&g.expr);
                self.write(")");
            }
        }
    }

    /// Write `expr`, parenthesized when it binds looser than its context
    fn visit_operand(&mut self, expr: &Expr, context: u8, strict: bool) {
        let prec = precedence(expr);
        if prec < context || (strict && prec == context) {
            self.write("(");
            self.visit_expr(expr);
            self.write(")");
        } else {
            self.visit_expr(expr);
        }
    }

    fn visit_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Number(n) => self.write(&n.to_string()),
            Literal::String(s) => {
                self.write("\"");
                self.write(&escape(s.chars(), '"'));
                self.write("\"");
            }
            Literal::Char(c) => {
                self.write("'");
                self.write(&escape(std::iter::once(*c), '\''));
                self.write("'");
            }
            Literal::Bool(b) => self.write(if *b { "true" } else { "false" }),
        }
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary(b) => b.op.precedence(),
        Expr::Unary(_) => UNARY_PRECEDENCE,
        _ => PRIMARY_PRECEDENCE,
    }
}

fn escape(chars: impl Iterator<Item = char>, quote: char) -> String {
    let mut result = String::new();
    for c in chars {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\0' => result.push_str("\\0"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            c => result.push(c),
        }
    }
    result
}
