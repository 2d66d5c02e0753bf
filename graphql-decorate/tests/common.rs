//! A blog schema and a small executor running the field extensions the way a host engine would.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use graphql_decorate::connection::ArrayConnection;
use graphql_decorate::connection::ConnectionWrapper;
use graphql_decorate::metadata::DecorationMetadata;
use graphql_decorate::spec::schema::ConnectionType;
use graphql_decorate::spec::schema::FieldDefinition;
use graphql_decorate::spec::schema::ObjectType;
use graphql_decorate::spec::schema::PolymorphicType;
use graphql_decorate::spec::schema::ScalarType;
use graphql_decorate::spec::FieldType;
use graphql_decorate::spec::TypeDescriptor;
use graphql_decorate::spec::TypeRef;
use graphql_decorate::Configuration;
use graphql_decorate::Decorated;
use graphql_decorate::DecoratedObject;
use graphql_decorate::Decorator;
use graphql_decorate::DecoratorClass;
use graphql_decorate::ExecutionContext;
use graphql_decorate::FieldValue;
use graphql_decorate::Object;
use graphql_decorate::Path;
use graphql_decorate::Resolved;
use graphql_decorate::Value;
use serde_json_bytes::json;
use tower::BoxError;

pub fn object(value: Value) -> Object {
    value.as_object().cloned().unwrap_or_default()
}

/// A decorator presenting fields through a plain function.
pub struct FixtureDecorator {
    name: &'static str,
    present: fn(&DecoratedObject, &str) -> Option<Value>,
}

impl Decorator for FixtureDecorator {
    fn name(&self) -> &str {
        self.name
    }

    fn field(&self, decorated: &DecoratedObject, name: &str) -> Option<Value> {
        (self.present)(decorated, name)
    }
}

fn decorator(name: &'static str, present: fn(&DecoratedObject, &str) -> Option<Value>) -> DecoratorClass {
    DecoratorClass::new(FixtureDecorator { name, present })
}

fn string_field(object: &Value, key: &str) -> Option<String> {
    object
        .as_object()?
        .get(key)?
        .as_str()
        .map(ToString::to_string)
}

fn metadata(decorated: &DecoratedObject, key: &str) -> Option<Value> {
    Some(decorated.context(key).cloned().unwrap_or(Value::Null))
}

pub fn blog_decorator() -> DecoratorClass {
    decorator("BlogDecorator", |blog, field| match field {
        "title" => {
            let name = string_field(blog.object(), "name")?;
            Some(Value::from(
                name.to_lowercase().split(' ').collect::<Vec<_>>().join("-"),
            ))
        }
        "activeStatus" => metadata(blog, "active"),
        "owner" => metadata(blog, "owner"),
        _ => None,
    })
}

pub fn post_decorator() -> DecoratorClass {
    decorator("PostDecorator", |post, field| match field {
        "name" => {
            let first_name = string_field(post.object(), "firstName")?;
            let last_name = string_field(post.object(), "lastName")?;
            Some(Value::from(format!("{first_name} {last_name}")))
        }
        "publishedStatus" => metadata(post, "published_status"),
        "blogOwner" => metadata(post, "owner"),
        "owner" => metadata(post, "post_owner"),
        _ => None,
    })
}

pub fn verified_comment_decorator() -> DecoratorClass {
    decorator("VerifiedCommentDecorator", |comment, field| match field {
        "disclaimer" => Some(Value::from("This user is verified")),
        "blogOwner" => metadata(comment, "owner"),
        "postOwner" => metadata(comment, "post_owner"),
        _ => None,
    })
}

pub fn unverified_comment_decorator() -> DecoratorClass {
    decorator("UnverifiedCommentDecorator", |comment, field| match field {
        "disclaimer" => Some(Value::from("This user is not verified")),
        "blogOwner" => metadata(comment, "owner"),
        "postOwner" => metadata(comment, "post_owner"),
        _ => None,
    })
}

pub fn reaction_decorator() -> DecoratorClass {
    decorator("ReactionDecorator", |reaction, field| match field {
        "postOwner" => metadata(reaction, "post_owner"),
        _ => None,
    })
}

pub fn image_decorator() -> DecoratorClass {
    decorator("ImageDecorator", |image, field| match field {
        "alternateText" => match string_field(image.object(), "url").as_deref() {
            Some("placeholder") => Some(Value::from("Placeholder")),
            _ => Some(Value::from("Profile picture")),
        },
        _ => None,
    })
}

/// Picks the comment decorator from `verifiedUser`; comments without it stay undecorated.
pub fn comment_evaluator(comment: &Value) -> Result<Option<DecoratorClass>, BoxError> {
    let verified = comment
        .as_object()
        .and_then(|comment| comment.get("verifiedUser"))
        .and_then(Value::as_bool);
    Ok(verified.map(|verified| {
        if verified {
            verified_comment_decorator()
        } else {
            unverified_comment_decorator()
        }
    }))
}

pub fn posts() -> Value {
    json!([
        {"firstName": "Bob", "lastName": "Boberson", "published": true},
        {"firstName": "Tod", "lastName": "Toderson", "published": false}
    ])
}

pub fn comments() -> Value {
    json!([
        {"verifiedUser": true, "message": "My comment 1"},
        {"verifiedUser": false, "message": "My comment 2"}
    ])
}

fn array(value: Value) -> Vec<Value> {
    value.as_array().cloned().unwrap_or_default()
}

type Resolver = Arc<dyn Fn(&Resolved) -> Result<FieldValue, BoxError> + Send + Sync>;

/// One field of a query, with its sub selections.
#[derive(Clone, Debug)]
pub struct Selection {
    pub name: String,
    pub selections: Vec<Selection>,
}

/// Parses selection sets such as `{ blog { name posts { name } } }`.
pub fn parse(query: &str) -> Vec<Selection> {
    let spaced = query.replace('{', " { ").replace('}', " } ");
    let mut tokens = spaced.split_whitespace().peekable();
    assert_eq!(tokens.next(), Some("{"));
    parse_selection_set(&mut tokens)
}

fn parse_selection_set<'a>(
    tokens: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Vec<Selection> {
    let mut selections = Vec::new();
    while let Some(token) = tokens.next() {
        if token == "}" {
            break;
        }
        let selections_of_field = if tokens.peek() == Some(&"{") {
            tokens.next();
            parse_selection_set(tokens)
        } else {
            Vec::new()
        };
        selections.push(Selection {
            name: token.to_string(),
            selections: selections_of_field,
        });
    }
    selections
}

/// The blog schema, its resolvers and an executor.
pub struct BlogSchema {
    query: Arc<ObjectType>,
    types: HashMap<String, Arc<ObjectType>>,
    resolvers: HashMap<(String, String), Resolver>,
    configuration: Option<Arc<Configuration>>,
}

impl BlogSchema {
    /// A schema decorating with `configuration`.
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration: Some(Arc::new(configuration)),
            ..Self::with_global_configuration()
        }
    }

    /// A schema decorating with the process wide configuration.
    pub fn with_global_configuration() -> Self {
        let string: TypeRef = Arc::new(ScalarType::new("String"));
        let boolean: TypeRef = Arc::new(ScalarType::new("Boolean"));
        let scalar = |ty: &TypeRef| FieldType::named(ty.clone());

        let reaction = Arc::new(
            ObjectType::new("Reaction")
                .decorate_with(reaction_decorator())
                .decorate_metadata(
                    DecorationMetadata::new()
                        .scoped(|_, _| Ok(object(json!({"post_owner": "Rod"})))),
                )
                .field(FieldDefinition::new("postOwner", scalar(&string))),
        );
        let image = Arc::new(
            ObjectType::new("Image")
                .decorate_with(image_decorator())
                .field(FieldDefinition::new("url", scalar(&string)))
                .field(FieldDefinition::new("alternateText", scalar(&string))),
        );
        let file = Arc::new(
            ObjectType::new("File").field(FieldDefinition::new("filePath", scalar(&string))),
        );
        let image_ref: TypeRef = image.clone();
        let file_ref: TypeRef = file.clone();
        let icon: TypeRef = Arc::new(PolymorphicType::interface("Icon").resolve_type_with(
            move |icon, _| {
                let icon = icon.as_object();
                if icon.map_or(false, |icon| icon.contains_key("url")) {
                    Ok(image_ref.clone())
                } else if icon.map_or(false, |icon| icon.contains_key("filePath")) {
                    Ok(file_ref.clone())
                } else {
                    Err("icon is neither an image nor a file".into())
                }
            },
        ));

        let reaction_ref: TypeRef = reaction.clone();
        let comment = Arc::new(
            ObjectType::new("Comment")
                .decorate_with_evaluator(comment_evaluator)
                .field(FieldDefinition::new("postOwner", scalar(&string)))
                .field(FieldDefinition::new("blogOwner", scalar(&string)))
                .field(FieldDefinition::new("verifiedUser", scalar(&boolean)))
                .field(FieldDefinition::new("disclaimer", scalar(&string)))
                .field(FieldDefinition::new("message", scalar(&string)))
                .field(FieldDefinition::new(
                    "reaction",
                    FieldType::named(reaction_ref).non_null(),
                )),
        );

        let comment_ref: TypeRef = comment.clone();
        let post = Arc::new(
            ObjectType::new("Post")
                .decorate_with(post_decorator())
                .decorate_metadata(
                    DecorationMetadata::new()
                        .unscoped(|post, _| {
                            let published = post.as_object().and_then(|post| post.get("published"));
                            Ok(object(json!({ "published_status": published })))
                        })
                        .scoped(|post, _| {
                            let first_name = post.as_object().and_then(|post| post.get("firstName"));
                            Ok(object(json!({ "post_owner": first_name })))
                        }),
                )
                .field(FieldDefinition::new("owner", scalar(&string)))
                .field(FieldDefinition::new("blogOwner", scalar(&string)))
                .field(FieldDefinition::new("publishedStatus", scalar(&boolean)))
                .field(FieldDefinition::new("firstName", scalar(&string)))
                .field(FieldDefinition::new("lastName", scalar(&string)))
                .field(FieldDefinition::new("name", scalar(&string)))
                .field(FieldDefinition::new(
                    "comments",
                    FieldType::named(comment_ref.clone()).list(),
                ))
                .field(FieldDefinition::new(
                    "commentConnection",
                    FieldType::named(Arc::new(ConnectionType::of(comment_ref))),
                ))
                .field(FieldDefinition::new("icons", FieldType::named(icon).list())),
        );

        let authenticated_user = Arc::new(
            ObjectType::new("AuthenticatedUser")
                .field(FieldDefinition::new("name", scalar(&string))),
        );
        let authenticated_user_ref: TypeRef = authenticated_user.clone();
        let user: TypeRef = Arc::new(
            PolymorphicType::union("User")
                .resolve_type_with(move |_, _| Ok(authenticated_user_ref.clone())),
        );

        let post_ref: TypeRef = post.clone();
        let blog = Arc::new(
            ObjectType::new("Blog")
                .decorate_with(blog_decorator())
                .decorate_metadata(
                    DecorationMetadata::new()
                        .unscoped(|blog, _| {
                            let active = blog.as_object().and_then(|blog| blog.get("active"));
                            Ok(object(json!({ "active": active })))
                        })
                        .scoped(|_, _| Ok(object(json!({"owner": "Bill Billerson"})))),
                )
                .field(FieldDefinition::new("owner", scalar(&string)))
                .field(FieldDefinition::new("activeStatus", scalar(&boolean)))
                .field(FieldDefinition::new("name", scalar(&string)))
                .field(FieldDefinition::new("title", scalar(&string)))
                .field(FieldDefinition::new(
                    "posts",
                    FieldType::named(post_ref.clone()).non_null().list(),
                ))
                .field(FieldDefinition::new(
                    "postConnection",
                    FieldType::named(Arc::new(ConnectionType::of(post_ref))),
                ))
                .field(FieldDefinition::new("user", FieldType::named(user))),
        );

        let blog_ref: TypeRef = blog.clone();
        let query = Arc::new(
            ObjectType::new("Query").field(FieldDefinition::new("blog", FieldType::named(blog_ref))),
        );

        let types = [
            &query,
            &blog,
            &post,
            &comment,
            &reaction,
            &image,
            &file,
            &authenticated_user,
        ]
        .into_iter()
        .map(|ty| (ty.name().to_string(), ty.clone()))
        .collect();

        let mut schema = Self {
            query,
            types,
            resolvers: HashMap::new(),
            configuration: None,
        };
        schema.resolve("Query", "blog", |_| {
            Ok(json!({"name": "My Blog", "active": true}).into())
        });
        schema.resolve("Blog", "posts", |_| Ok(posts().into()));
        schema.resolve("Blog", "postConnection", |blog| {
            let connection = ArrayConnection::new(array(posts())).with_field_name("postConnection");
            let connection = match blog.object() {
                Some(blog) => connection.with_parent(blog.clone()),
                None => connection,
            };
            Ok(FieldValue::Connection(Arc::new(connection)))
        });
        schema.resolve("Blog", "user", |_| Ok(json!({"authenticated": true}).into()));
        schema.resolve("Post", "comments", |_| Ok(comments().into()));
        schema.resolve("Post", "commentConnection", |_| {
            Ok(FieldValue::Connection(Arc::new(ArrayConnection::new(
                array(comments()),
            ))))
        });
        schema.resolve("Post", "icons", |_| {
            Ok(json!([{"url": "https://www.image.com"}, {"url": "placeholder"}]).into())
        });
        schema.resolve("Comment", "reaction", |_| Ok(json!("Wow!").into()));
        schema
    }

    /// Overrides the resolver of a field.
    pub fn resolve<F>(&mut self, type_name: &str, field_name: &str, resolver: F) -> &mut Self
    where
        F: Fn(&Resolved) -> Result<FieldValue, BoxError> + Send + Sync + 'static,
    {
        self.resolvers.insert(
            (type_name.to_string(), field_name.to_string()),
            Arc::new(resolver),
        );
        self
    }

    pub fn object_type(&self, name: &str) -> Arc<ObjectType> {
        self.types[name].clone()
    }

    pub fn new_context(&self) -> ExecutionContext {
        match &self.configuration {
            Some(configuration) => configuration.new_context(),
            None => graphql_decorate::configuration().new_context(),
        }
    }

    pub fn execute(&self, query: &str) -> Result<serde_json::Value, BoxError> {
        self.execute_with_context(query, &self.new_context())
    }

    pub fn execute_with_context(
        &self,
        query: &str,
        context: &ExecutionContext,
    ) -> Result<serde_json::Value, BoxError> {
        let root = Resolved::Value(json!({}));
        let data =
            self.execute_selection_set(&root, &self.query, &parse(query), &Path::empty(), context)?;
        Ok(serde_json::to_value(data)?)
    }

    fn execute_selection_set(
        &self,
        parent: &Resolved,
        parent_type: &Arc<ObjectType>,
        selections: &[Selection],
        path: &Path,
        context: &ExecutionContext,
    ) -> Result<Value, BoxError> {
        let parent_type_ref: TypeRef = parent_type.clone();
        let mut output = Object::new();
        for selection in selections {
            let definition = parent_type
                .field_definition(&selection.name)
                .ok_or_else(|| format!("unknown field {}.{}", parent_type.name(), selection.name))?;
            let field_path = path.join(selection.name.as_str());
            let value = match self
                .resolvers
                .get(&(parent_type.name().to_string(), selection.name.clone()))
            {
                Some(resolver) => resolver(parent)?,
                None => parent.field(&selection.name).unwrap_or(Value::Null).into(),
            };

            let resolved = match definition.extension() {
                Some(extension) => {
                    let extension = match &self.configuration {
                        Some(configuration) => extension.clone().with_configuration(configuration.clone()),
                        None => extension.clone(),
                    };
                    extension
                        .after_resolve(
                            context,
                            Some(value),
                            parent.object(),
                            Some(&parent_type_ref),
                            &field_path,
                        )?
                        .unwrap_or(Resolved::Value(Value::Null))
                }
                None => match value {
                    FieldValue::Value(value) => Resolved::Value(value),
                    FieldValue::Connection(_) => return Err("undecorated connection".into()),
                },
            };

            let completed = self.complete(
                resolved,
                definition.field_type().inner_type(),
                &selection.selections,
                &field_path,
                context,
            )?;
            output.insert(selection.name.clone(), completed);
        }
        Ok(Value::Object(output))
    }

    fn complete(
        &self,
        resolved: Resolved,
        ty: &TypeRef,
        selections: &[Selection],
        path: &Path,
        context: &ExecutionContext,
    ) -> Result<Value, BoxError> {
        match resolved {
            Resolved::List(items) => self.complete_list(items, ty, selections, path, context),
            Resolved::Value(Value::Array(items)) => self.complete_list(
                items.into_iter().map(Resolved::Value).collect(),
                ty,
                selections,
                path,
                context,
            ),
            Resolved::Connection(wrapper) => {
                self.complete_connection(&wrapper, selections, path, context)
            }
            resolved => {
                let Some(value) = resolved.object() else {
                    return Ok(Value::Null);
                };
                if selections.is_empty() || value.is_null() {
                    return Ok(value.clone());
                }
                let object_type = self.object_type_of(ty, value, context)?;
                self.execute_selection_set(&resolved, &object_type, selections, path, context)
            }
        }
    }

    fn complete_list(
        &self,
        items: Vec<Resolved>,
        ty: &TypeRef,
        selections: &[Selection],
        path: &Path,
        context: &ExecutionContext,
    ) -> Result<Value, BoxError> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.complete(item, ty, selections, &path.join(index), context))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn complete_connection(
        &self,
        wrapper: &ConnectionWrapper,
        selections: &[Selection],
        path: &Path,
        context: &ExecutionContext,
    ) -> Result<Value, BoxError> {
        let node_type = wrapper.node_type().clone();
        let mut output = Object::new();
        for selection in selections {
            let value = match selection.name.as_str() {
                "nodes" => {
                    let nodes = wrapper.nodes()?;
                    let path = path.join("nodes");
                    self.complete_list(nodes, &node_type, &selection.selections, &path, context)?
                }
                "edges" => {
                    let nodes = wrapper.edge_nodes()?;
                    let mut edges = Vec::new();
                    for (index, node) in nodes.into_iter().enumerate() {
                        let mut edge = Object::new();
                        for edge_selection in &selection.selections {
                            if edge_selection.name == "node" {
                                let path = path.join("edges").join(index).join("node");
                                let node = self.complete(
                                    node.clone(),
                                    &node_type,
                                    &edge_selection.selections,
                                    &path,
                                    context,
                                )?;
                                edge.insert("node", node);
                            }
                        }
                        edges.push(Value::Object(edge));
                    }
                    Value::Array(edges)
                }
                "pageInfo" => {
                    let page_info = wrapper
                        .downcast_ref::<ArrayConnection>()
                        .ok_or("not an array connection")?
                        .page_info()?;
                    let page_info = serde_json_bytes::to_value(page_info)?;
                    let mut selected = Object::new();
                    for info in &selection.selections {
                        let value = page_info
                            .as_object()
                            .and_then(|page_info| page_info.get(info.name.as_str()))
                            .cloned()
                            .unwrap_or(Value::Null);
                        selected.insert(info.name.clone(), value);
                    }
                    Value::Object(selected)
                }
                other => return Err(format!("unknown connection field {other}").into()),
            };
            output.insert(selection.name.clone(), value);
        }
        Ok(Value::Object(output))
    }

    fn object_type_of(
        &self,
        ty: &TypeRef,
        value: &Value,
        context: &ExecutionContext,
    ) -> Result<Arc<ObjectType>, BoxError> {
        let ty = if ty.kind().is_polymorphic() {
            ty.resolve_type(value, context)?
        } else {
            ty.clone()
        };
        self.types
            .get(ty.name())
            .cloned()
            .ok_or_else(|| format!("unknown type {}", ty.name()).into())
    }
}

/// Counts the decorators constructed through a configuration.
pub fn count_decorations(configuration: &mut Configuration) -> Arc<DashMap<String, usize>> {
    let counts: Arc<DashMap<String, usize>> = Default::default();
    let recorded = counts.clone();
    configuration.decorate(move |class, value, metadata| {
        *recorded.entry(class.name().to_string()).or_insert(0) += 1;
        class.decorate(value, metadata)
    });
    counts
}

pub fn count(counts: &DashMap<String, usize>, decorator: &str) -> usize {
    counts.get(decorator).map(|count| *count).unwrap_or_default()
}
