//! GRANT, REVOKE and ALTER DEFAULT PRIVILEGES.

use inflector::Inflector;

use super::context::Context;
use super::ddl::{object_keyword, object_name};
use super::deparser::{qualified_name, strings, Deparse, Deparser};
use super::query::column_names;
use super::quote::is_plain_identifier;
use super::token::{Token, TokenStream};
use crate::ast::*;
use crate::error::{DeparseError, Result};

/// Object keywords whose plural the inflector gets wrong.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[("schema", "schemas")];

/// Plural of an object keyword, e.g. `TABLE` to `TABLES`.
fn pluralize(keyword: &str) -> String {
    let lower = keyword.to_lowercase();
    let plural = IRREGULAR_PLURALS
        .iter()
        .find(|(singular, _)| *singular == lower)
        .map(|(_, plural)| plural.to_string())
        .unwrap_or_else(|| lower.to_plural());
    plural.to_uppercase()
}

/// Object keyword as spelled after `ON` in a privilege statement.
fn grant_keyword(objtype: &ObjectType) -> Result<&'static str> {
    match objtype {
        ObjectType::ForeignServer => Ok("FOREIGN SERVER"),
        other => object_keyword(other)
            .ok_or_else(|| DeparseError::variant("GrantStmt", other.as_tag().to_string())),
    }
}

/// A privilege or role name: upper-cased when it is a plain word, quoted
/// otherwise.
fn privilege_name(name: &str) -> Token {
    if is_plain_identifier(name) {
        Token::Raw(name.to_uppercase())
    } else {
        Token::Ident(name.to_string())
    }
}

impl Deparse for RoleSpec {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        let token = match self.roletype.as_ref() {
            None | Some(RoleSpecType::CString) => {
                if self.rolename.is_empty() {
                    return Err(DeparseError::missing("RoleSpec", "rolename"));
                }
                Token::Ident(self.rolename.clone())
            }
            Some(RoleSpecType::CurrentRole) => Token::Keyword("CURRENT_ROLE"),
            Some(RoleSpecType::CurrentUser) => Token::Keyword("CURRENT_USER"),
            Some(RoleSpecType::SessionUser) => Token::Keyword("SESSION_USER"),
            Some(RoleSpecType::Public) => Token::Keyword("PUBLIC"),
            Some(RoleSpecType::Unrecognized(value)) => {
                return Err(DeparseError::variant("RoleSpec", value.clone()))
            }
        };
        Ok(token.into())
    }
}

impl Deparse for AccessPriv {
    fn to_tokens(&self, _dp: &Deparser, _ctx: Context) -> Result<TokenStream> {
        let mut ts = if self.priv_name.is_empty() {
            TokenStream::from(Token::Keyword("ALL"))
        } else {
            TokenStream::from(privilege_name(&self.priv_name))
        };
        ts.append(column_names(&self.cols, "AccessPriv")?);
        Ok(ts)
    }
}

impl Deparse for ObjectWithArgs {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let parts = strings(&self.objname, "ObjectWithArgs")?;
        let Some((last, schema)) = parts.split_last() else {
            return Err(DeparseError::missing("ObjectWithArgs", "objname"));
        };

        // Operators are named by their symbol, which is never quoted.
        let mut ts = if is_plain_identifier(last) || last.chars().any(char::is_alphanumeric) {
            qualified_name(&self.objname, "ObjectWithArgs")?
        } else {
            let mut ts = TokenStream::new();
            for part in schema {
                ts.ident(part.to_string()).push(Token::Dot);
            }
            ts.push(Token::Raw(last.to_string()));
            ts
        };

        if !self.args_unspecified {
            let args = self
                .objargs
                .iter()
                .map(|arg| match arg {
                    Node::Null(_) => Ok(TokenStream::from(Token::Keyword("NONE"))),
                    other => dp.node(other, ctx),
                })
                .collect::<Result<Vec<_>>>()?;
            let mut list = TokenStream::new();
            list.comma_separated(args);
            ts.parenthesized(list);
        }
        Ok(ts)
    }
}

impl GrantStmt {
    /// `ON ...` target, which depends on the target kind.
    fn target(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let objtype = self
            .objtype
            .as_ref()
            .ok_or_else(|| DeparseError::missing("GrantStmt", "objtype"))?;
        let keyword = grant_keyword(objtype)?;

        let mut ts = TokenStream::from(Token::Keyword("ON"));
        match self.targtype.as_ref() {
            None | Some(GrantTargetType::Object) => {
                if self.objects.is_empty() {
                    return Err(DeparseError::missing("GrantStmt", "objects"));
                }
                let objects = self
                    .objects
                    .iter()
                    .map(|object| object_name(dp, object, "GrantStmt", ctx))
                    .collect::<Result<Vec<_>>>()?;
                ts.then(keyword).space().comma_separated(objects);
            }
            Some(GrantTargetType::AllInSchema) => {
                if self.objects.is_empty() {
                    return Err(DeparseError::missing("GrantStmt", "objects"));
                }
                let schemas = self
                    .objects
                    .iter()
                    .map(|object| object_name(dp, object, "GrantStmt", ctx))
                    .collect::<Result<Vec<_>>>()?;
                ts.then("ALL")
                    .space()
                    .push(Token::Raw(pluralize(keyword)))
                    .then("IN SCHEMA")
                    .space()
                    .comma_separated(schemas);
            }
            Some(GrantTargetType::Defaults) => {
                ts.space().push(Token::Raw(pluralize(keyword)));
            }
            Some(GrantTargetType::Unrecognized(value)) => {
                return Err(DeparseError::variant("GrantStmt", value.clone()))
            }
        }
        Ok(ts)
    }
}

impl Deparse for GrantStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let privileges = if self.privileges.is_empty() {
            TokenStream::from(Token::Keyword("ALL"))
        } else {
            dp.list(&self.privileges, ctx)?
        };
        let grantees = dp.required_list(&self.grantees, "GrantStmt", "grantees", ctx)?;
        let target = self.target(dp, ctx)?;

        let mut ts = TokenStream::new();
        if self.is_grant {
            ts.keyword("GRANT")
                .space()
                .append(privileges)
                .space()
                .append(target)
                .then("TO")
                .space()
                .append(grantees);
            if self.grant_option {
                ts.then("WITH GRANT OPTION");
            }
        } else {
            ts.keyword("REVOKE");
            if self.grant_option {
                ts.then("GRANT OPTION FOR");
            }
            ts.space()
                .append(privileges)
                .space()
                .append(target)
                .then("FROM")
                .space()
                .append(grantees);
        }

        if let Some(grantor) = &self.grantor {
            ts.then("GRANTED BY").space().append(dp.render(grantor, ctx)?);
        }
        if !self.is_grant {
            match self.behavior.as_ref() {
                Some(DropBehavior::Cascade) => {
                    ts.then("CASCADE");
                }
                None | Some(DropBehavior::Restrict) => {}
                Some(DropBehavior::Unrecognized(value)) => {
                    return Err(DeparseError::variant("GrantStmt", value.clone()))
                }
            }
        }
        Ok(ts)
    }
}

fn is_enabled(def: &DefElem) -> bool {
    match def.arg.as_ref() {
        None => true,
        Some(Node::Boolean(b)) => b.boolval,
        Some(Node::Integer(n)) => n.ival != 0,
        Some(Node::String(s)) => matches!(s.sval.as_str(), "true" | "on" | "option"),
        Some(_) => true,
    }
}

fn role_options(opt: &[Node]) -> Result<Vec<&DefElem>> {
    opt.iter()
        .map(|node| match node {
            Node::DefElem(def) => Ok(def.as_ref()),
            other => Err(DeparseError::malformed(
                "GrantRoleStmt",
                format!("expected a DefElem option, found {}", other.kind()),
            )),
        })
        .collect()
}

fn role_option_keyword(name: &str) -> Result<&'static str> {
    match name {
        "admin" => Ok("ADMIN"),
        "inherit" => Ok("INHERIT"),
        "set" => Ok("SET"),
        other => Err(DeparseError::variant("GrantRoleStmt", other)),
    }
}

impl Deparse for GrantRoleStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let roles = dp.required_list(&self.granted_roles, "GrantRoleStmt", "granted_roles", ctx)?;
        let grantees =
            dp.required_list(&self.grantee_roles, "GrantRoleStmt", "grantee_roles", ctx)?;
        let options = role_options(&self.opt)?;

        let mut ts = TokenStream::new();
        if self.is_grant {
            ts.keyword("GRANT")
                .space()
                .append(roles)
                .then("TO")
                .space()
                .append(grantees);

            let mut with = Vec::new();
            if self.admin_opt {
                with.push(TokenStream::from(Token::Keyword("ADMIN OPTION")));
            }
            for def in options {
                let keyword = role_option_keyword(&def.defname)?;
                let mut part = TokenStream::from(Token::Keyword(keyword));
                match (keyword, is_enabled(def)) {
                    ("ADMIN", true) => part.then("OPTION"),
                    (_, true) => part.then("TRUE"),
                    (_, false) => part.then("FALSE"),
                };
                with.push(part);
            }
            if !with.is_empty() {
                ts.then("WITH").space().comma_separated(with);
            }
        } else {
            ts.keyword("REVOKE");
            if self.admin_opt {
                ts.then("ADMIN OPTION FOR");
            }
            for def in options {
                ts.then(role_option_keyword(&def.defname)?).then("OPTION FOR");
            }
            ts.space()
                .append(roles)
                .then("FROM")
                .space()
                .append(grantees);
        }

        if let Some(grantor) = &self.grantor {
            ts.then("GRANTED BY").space().append(dp.render(grantor, ctx)?);
        }
        if !self.is_grant {
            match self.behavior.as_ref() {
                Some(DropBehavior::Cascade) => {
                    ts.then("CASCADE");
                }
                None | Some(DropBehavior::Restrict) => {}
                Some(DropBehavior::Unrecognized(value)) => {
                    return Err(DeparseError::variant("GrantRoleStmt", value.clone()))
                }
            }
        }
        Ok(ts)
    }
}

impl Deparse for AlterDefaultPrivilegesStmt {
    fn to_tokens(&self, dp: &Deparser, ctx: Context) -> Result<TokenStream> {
        let ctx = ctx.operand();
        let mut ts = TokenStream::from(Token::Keyword("ALTER DEFAULT PRIVILEGES"));

        for option in &self.options {
            let Node::DefElem(def) = option else {
                return Err(DeparseError::malformed(
                    "AlterDefaultPrivilegesStmt",
                    format!("expected a DefElem option, found {}", option.kind()),
                ));
            };
            let values = def.arg.as_ref().map(Node::items).unwrap_or_default();
            match def.defname.as_str() {
                "schemas" => {
                    let schemas = values
                        .iter()
                        .map(|node| object_name(dp, node, "AlterDefaultPrivilegesStmt", ctx))
                        .collect::<Result<Vec<_>>>()?;
                    ts.then("IN SCHEMA").space().comma_separated(schemas);
                }
                "roles" => {
                    ts.then("FOR ROLE").space().append(dp.list(values, ctx)?);
                }
                other => return Err(DeparseError::variant("DefElem", other)),
            }
        }

        let action = self
            .action
            .as_ref()
            .ok_or_else(|| DeparseError::missing("AlterDefaultPrivilegesStmt", "action"))?;
        ts.space().append(dp.render(action, ctx)?);
        Ok(ts)
    }
}
