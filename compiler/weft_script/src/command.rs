//! Script commands and the script aggregate.
//!
//! A script is an ordered command sequence: module definitions interleaved
//! with actions and assertions about them. Commands that define a named
//! module also bind that name to the command's position, so later references
//! can find the module by name or by definition order.

use weft_ir::{Binding, BindingMap, Const, LookupError, Module, Span, Var};

use crate::Action;

/// A module that may not be decoded yet. Assertions about malformed input
/// need to carry raw text or bytes that will never parse into a [`Module`].
#[derive(Clone, Debug)]
pub enum ScriptModule {
    /// A fully decoded module.
    Text(Module),
    /// Raw binary contents, decoded (and possibly rejected) later.
    Binary {
        span: Span,
        name: String,
        data: Vec<u8>,
    },
    /// Quoted source text, parsed (and possibly rejected) later.
    Quoted {
        span: Span,
        name: String,
        data: Vec<u8>,
    },
}

impl ScriptModule {
    /// The module's declaration site.
    pub fn span(&self) -> Span {
        match self {
            ScriptModule::Text(module) => module.span,
            ScriptModule::Binary { span, .. } | ScriptModule::Quoted { span, .. } => *span,
        }
    }

    /// The module's name; empty means unnamed.
    pub fn name(&self) -> &str {
        match self {
            ScriptModule::Text(module) => &module.name,
            ScriptModule::Binary { name, .. } | ScriptModule::Quoted { name, .. } => name,
        }
    }
}

/// The closed set of script commands.
#[derive(Clone, Debug)]
pub enum Command {
    /// Define (and implicitly instantiate) a module.
    Module(Module),
    /// Perform an action, discarding its results.
    Action(Action),
    /// Make a module's exports available under an external name.
    Register {
        span: Span,
        module_name: String,
        var: Var,
    },
    /// Assert that a module fails to decode or parse.
    AssertMalformed { module: ScriptModule, text: String },
    /// Assert that a module decodes but fails validation.
    AssertInvalid { module: ScriptModule, text: String },
    /// Assert that a module validates but fails to link.
    AssertUnlinkable { module: ScriptModule, text: String },
    /// Assert that a module links but traps during instantiation.
    AssertUninstantiable { module: ScriptModule, text: String },
    /// Assert an action's results, value for value.
    AssertReturn {
        action: Action,
        expected: Vec<Const>,
    },
    /// Assert an action returns a function reference.
    AssertReturnFunc { action: Action },
    /// Assert an action returns a canonical NaN.
    AssertReturnCanonicalNan { action: Action },
    /// Assert an action returns an arithmetic NaN.
    AssertReturnArithmeticNan { action: Action },
    /// Assert an action traps with the given message.
    AssertTrap { action: Action, text: String },
    /// Assert an action exhausts a resource (typically call stack).
    AssertExhaustion { action: Action, text: String },
}

impl Command {
    /// Stable command name, for diagnostics by external layers.
    pub const fn name(&self) -> &'static str {
        match self {
            Command::Module(_) => "module",
            Command::Action(_) => "action",
            Command::Register { .. } => "register",
            Command::AssertMalformed { .. } => "assert_malformed",
            Command::AssertInvalid { .. } => "assert_invalid",
            Command::AssertUnlinkable { .. } => "assert_unlinkable",
            Command::AssertUninstantiable { .. } => "assert_uninstantiable",
            Command::AssertReturn { .. } => "assert_return",
            Command::AssertReturnFunc { .. } => "assert_return_func",
            Command::AssertReturnCanonicalNan { .. } => "assert_return_canonical_nan",
            Command::AssertReturnArithmeticNan { .. } => "assert_return_arithmetic_nan",
            Command::AssertTrap { .. } => "assert_trap",
            Command::AssertExhaustion { .. } => "assert_exhaustion",
        }
    }
}

/// An ordered command sequence plus the module name bindings derived from
/// it.
///
/// Named module-definition commands bind their name to the command's
/// position in the sequence; the bindings are maintained only by
/// [`Script::append_command`].
#[derive(Debug)]
pub struct Script {
    commands: Vec<Command>,
    module_bindings: BindingMap,
}

impl Default for Script {
    fn default() -> Self {
        Script::new()
    }
}

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Script {
            commands: Vec::new(),
            module_bindings: BindingMap::new("module"),
        }
    }

    /// The commands, in script order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Append one command. A named module definition binds its name to
    /// this command's position (last binding wins on re-use).
    #[expect(clippy::cast_possible_truncation)]
    pub fn append_command(&mut self, command: Command) {
        if let Command::Module(module) = &command {
            if !module.name.is_empty() {
                self.module_bindings.insert(
                    module.name.clone(),
                    Binding::new(self.commands.len() as u32, module.span),
                );
            }
        }
        self.commands.push(command);
    }

    /// The first defined module, if any.
    pub fn first_module(&self) -> Option<&Module> {
        self.commands.iter().find_map(|command| match command {
            Command::Module(module) => Some(module),
            _ => None,
        })
    }

    /// Resolve a module reference. Index-form references address the
    /// command sequence directly; name-form references go through the
    /// module bindings.
    #[expect(clippy::cast_possible_truncation)]
    pub fn get_module(&self, var: &Var) -> Result<&Module, LookupError> {
        let index = self.module_bindings.resolve(var)?;
        match self.commands.get(index as usize) {
            Some(Command::Module(module)) => Ok(module),
            Some(_) => unreachable!("module binding points at a non-module command"),
            None => Err(LookupError::OutOfRange {
                space: "module",
                index,
                len: self.commands.len() as u32,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weft_ir::{ExternalKind, Export, ModuleField, ModuleFieldKind};

    fn named_module(name: &str) -> Module {
        let mut module = Module::new();
        module.name = name.to_string();
        module
    }

    #[test]
    fn named_modules_bind_their_command_position() {
        let mut script = Script::new();
        script.append_command(Command::Module(named_module("$a")));
        script.append_command(Command::Action(Action::invoke(
            Var::name("$a", Span::DUMMY),
            "run",
            Span::DUMMY,
        )));
        script.append_command(Command::Module(named_module("$b")));

        let Ok(module) = script.get_module(&Var::name("$b", Span::DUMMY)) else {
            panic!("$b resolves");
        };
        assert_eq!(module.name, "$b");

        // Index-form references address the command sequence, so the
        // second module sits at position 2, not 1.
        let Ok(module) = script.get_module(&Var::index(2, Span::DUMMY)) else {
            panic!("command 2 is a module");
        };
        assert_eq!(module.name, "$b");
    }

    #[test]
    fn unknown_module_name() {
        let script = Script::new();
        assert!(matches!(
            script.get_module(&Var::name("$missing", Span::DUMMY)),
            Err(LookupError::NotFound {
                space: "module",
                ..
            })
        ));
    }

    #[test]
    fn module_index_out_of_range() {
        let mut script = Script::new();
        script.append_command(Command::Module(named_module("$a")));
        assert_eq!(
            script.get_module(&Var::index(4, Span::DUMMY)).err(),
            Some(LookupError::OutOfRange {
                space: "module",
                index: 4,
                len: 1,
            })
        );
    }

    #[test]
    fn first_module_skips_other_commands() {
        let mut script = Script::new();
        assert!(script.first_module().is_none());

        script.append_command(Command::Register {
            span: Span::DUMMY,
            module_name: "spectest".to_string(),
            var: Var::index(0, Span::DUMMY),
        });
        script.append_command(Command::Module(named_module("$first")));
        script.append_command(Command::Module(named_module("$second")));

        assert_eq!(script.first_module().map(|m| m.name.as_str()), Some("$first"));
    }

    #[test]
    fn module_rebinding_follows_the_later_definition() {
        let mut script = Script::new();
        script.append_command(Command::Module(named_module("$m")));
        script.append_command(Command::Module(named_module("$m")));

        assert!(script.get_module(&Var::name("$m", Span::DUMMY)).is_ok());
        assert_eq!(
            script.module_bindings.resolve(&Var::name("$m", Span::DUMMY)),
            Ok(1)
        );
    }

    #[test]
    fn undecoded_modules_carry_raw_bytes() {
        let module = ScriptModule::Binary {
            span: Span::new(3, 10),
            name: "$bin".to_string(),
            data: vec![0x00, 0x61, 0x73, 0x6d],
        };
        assert_eq!(module.name(), "$bin");
        assert_eq!(module.span(), Span::new(3, 10));

        let command = Command::AssertMalformed {
            module,
            text: "unexpected end".to_string(),
        };
        assert_eq!(command.name(), "assert_malformed");
    }

    #[test]
    fn assertion_commands_wrap_actions() {
        let action = Action::invoke(Var::index(0, Span::DUMMY), "grow", Span::DUMMY);
        let command = Command::AssertTrap {
            action,
            text: "out of bounds".to_string(),
        };
        let Command::AssertTrap { action, text } = &command else {
            panic!("expected assert_trap");
        };
        assert_eq!(action.name, "grow");
        assert_eq!(text, "out of bounds");
    }

    #[test]
    fn scripted_module_lookup_reaches_exports() {
        let mut module = named_module("$m");
        module.append_field(ModuleField::new(
            ModuleFieldKind::Export(Export {
                name: "answer".to_string(),
                kind: ExternalKind::Global,
                var: Var::index(0, Span::DUMMY),
            }),
            Span::DUMMY,
        ));

        let mut script = Script::new();
        script.append_command(Command::Module(module));

        let Ok(module) = script.get_module(&Var::name("$m", Span::DUMMY)) else {
            panic!("$m resolves");
        };
        let Some(export) = module.get_export("answer") else {
            panic!("export is present");
        };
        assert_eq!(export.kind, ExternalKind::Global);
    }
}
