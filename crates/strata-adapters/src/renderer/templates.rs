//! C# artifact templates.
//!
//! Placeholders are `{{NAME}}`; see `EmissionContext` for the variable set.
//! `ENTITY_PARAM` and `CREATED_ROUTE` are added by the renderer. Single
//! braces are C# syntax and pass through untouched.

pub const SERVICE: &str = r#"// Generated by strata. This file is never regenerated; edit freely.
using System.Reflection;
using {{ENTITY_NAMESPACE}};
using {{REPOSITORY_NAMESPACE}};

namespace {{SERVICE_NAMESPACE}};

public interface I{{ENTITY}}Service
{
    Task<IReadOnlyList<{{ENTITY}}>> GetAllAsync(CancellationToken cancellationToken = default);
    Task<{{ENTITY}}?> GetByIdAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default);
    Task<{{ENTITY}}> CreateAsync({{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default);
    Task<{{ENTITY}}?> UpdateAsync({{KEY_TYPE}} id, {{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default);
    Task<bool> DeleteAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default);
}

public class {{ENTITY}}Service : I{{ENTITY}}Service
{
    private readonly IRepository<{{ENTITY}}, {{KEY_TYPE}}> _repository;

    public {{ENTITY}}Service(IRepository<{{ENTITY}}, {{KEY_TYPE}}> repository)
    {
        _repository = repository;
    }

    public async Task<IReadOnlyList<{{ENTITY}}>> GetAllAsync(CancellationToken cancellationToken = default)
    {
        var items = await _repository.GetAllAsync(cancellationToken);
        return items.ToList();
    }

    public Task<{{ENTITY}}?> GetByIdAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default)
    {
        return _repository.GetByIdAsync(id, cancellationToken);
    }

    public async Task<{{ENTITY}}> CreateAsync({{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default)
    {
        await _repository.AddAsync({{ENTITY_PARAM}}, cancellationToken);
        return {{ENTITY_PARAM}};
    }

    public async Task<{{ENTITY}}?> UpdateAsync({{KEY_TYPE}} id, {{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default)
    {
        var existing = await _repository.GetByIdAsync(id, cancellationToken);
        if (existing is null)
        {
            return null;
        }

        foreach (var property in typeof({{ENTITY}}).GetProperties(BindingFlags.Public | BindingFlags.Instance))
        {
            if (property.Name == "Id" || !property.CanRead || !property.CanWrite)
            {
                continue;
            }
            property.SetValue(existing, property.GetValue({{ENTITY_PARAM}}));
        }

        await _repository.UpdateAsync(existing, cancellationToken);
        return existing;
    }

    public async Task<bool> DeleteAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default)
    {
        var existing = await _repository.GetByIdAsync(id, cancellationToken);
        if (existing is null)
        {
            return false;
        }

        await _repository.DeleteAsync(existing, cancellationToken);
        return true;
    }
}
"#;

/// Same surface as [`SERVICE`]; reads hide `IsDeleted` records and delete
/// flags instead of removing.
pub const SERVICE_SOFT_DELETE: &str = r#"// Generated by strata. This file is never regenerated; edit freely.
using System.Reflection;
using {{ENTITY_NAMESPACE}};
using {{REPOSITORY_NAMESPACE}};

namespace {{SERVICE_NAMESPACE}};

public interface I{{ENTITY}}Service
{
    Task<IReadOnlyList<{{ENTITY}}>> GetAllAsync(CancellationToken cancellationToken = default);
    Task<{{ENTITY}}?> GetByIdAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default);
    Task<{{ENTITY}}> CreateAsync({{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default);
    Task<{{ENTITY}}?> UpdateAsync({{KEY_TYPE}} id, {{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default);
    Task<bool> DeleteAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default);
}

public class {{ENTITY}}Service : I{{ENTITY}}Service
{
    private readonly IRepository<{{ENTITY}}, {{KEY_TYPE}}> _repository;

    public {{ENTITY}}Service(IRepository<{{ENTITY}}, {{KEY_TYPE}}> repository)
    {
        _repository = repository;
    }

    public async Task<IReadOnlyList<{{ENTITY}}>> GetAllAsync(CancellationToken cancellationToken = default)
    {
        var items = await _repository.GetAllAsync(cancellationToken);
        return items.Where(item => !item.IsDeleted).ToList();
    }

    public async Task<{{ENTITY}}?> GetByIdAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default)
    {
        var existing = await _repository.GetByIdAsync(id, cancellationToken);
        return existing is null || existing.IsDeleted ? null : existing;
    }

    public async Task<{{ENTITY}}> CreateAsync({{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default)
    {
        {{ENTITY_PARAM}}.IsDeleted = false;
        await _repository.AddAsync({{ENTITY_PARAM}}, cancellationToken);
        return {{ENTITY_PARAM}};
    }

    public async Task<{{ENTITY}}?> UpdateAsync({{KEY_TYPE}} id, {{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken = default)
    {
        var existing = await GetByIdAsync(id, cancellationToken);
        if (existing is null)
        {
            return null;
        }

        foreach (var property in typeof({{ENTITY}}).GetProperties(BindingFlags.Public | BindingFlags.Instance))
        {
            if (property.Name is "Id" or "IsDeleted" || !property.CanRead || !property.CanWrite)
            {
                continue;
            }
            property.SetValue(existing, property.GetValue({{ENTITY_PARAM}}));
        }

        await _repository.UpdateAsync(existing, cancellationToken);
        return existing;
    }

    public async Task<bool> DeleteAsync({{KEY_TYPE}} id, CancellationToken cancellationToken = default)
    {
        var existing = await GetByIdAsync(id, cancellationToken);
        if (existing is null)
        {
            return false;
        }

        existing.IsDeleted = true;
        await _repository.UpdateAsync(existing, cancellationToken);
        return true;
    }
}
"#;

pub const CONTROLLER: &str = r#"// Generated by strata. This file is never regenerated; edit freely.
using Microsoft.AspNetCore.Mvc;
using {{ENTITY_NAMESPACE}};
using {{SERVICE_NAMESPACE}};

namespace {{CONTROLLER_NAMESPACE}};

[ApiController]
[Route("api/[controller]")]
public class {{ENTITY}}Controller : ControllerBase
{
    private readonly I{{ENTITY}}Service _service;

    public {{ENTITY}}Controller(I{{ENTITY}}Service service)
    {
        _service = service;
    }

    [HttpGet]
    [ProducesResponseType(StatusCodes.Status200OK)]
    public async Task<ActionResult<IReadOnlyList<{{ENTITY}}>>> GetAll(CancellationToken cancellationToken)
    {
        return Ok(await _service.GetAllAsync(cancellationToken));
    }

    [HttpGet("{id}")]
    [ProducesResponseType(StatusCodes.Status200OK)]
    [ProducesResponseType(StatusCodes.Status404NotFound)]
    public async Task<ActionResult<{{ENTITY}}>> GetById({{KEY_TYPE}} id, CancellationToken cancellationToken)
    {
        var {{ENTITY_PARAM}} = await _service.GetByIdAsync(id, cancellationToken);
        return {{ENTITY_PARAM}} is null ? NotFound() : Ok({{ENTITY_PARAM}});
    }

    [HttpPost]
    [ProducesResponseType(StatusCodes.Status201Created)]
    public async Task<ActionResult<{{ENTITY}}>> Create({{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken)
    {
        var created = await _service.CreateAsync({{ENTITY_PARAM}}, cancellationToken);
        return CreatedAtAction({{CREATED_ROUTE}}, created);
    }

    [HttpPut("{id}")]
    [ProducesResponseType(StatusCodes.Status200OK)]
    [ProducesResponseType(StatusCodes.Status404NotFound)]
    public async Task<ActionResult<{{ENTITY}}>> Update({{KEY_TYPE}} id, {{ENTITY}} {{ENTITY_PARAM}}, CancellationToken cancellationToken)
    {
        var updated = await _service.UpdateAsync(id, {{ENTITY_PARAM}}, cancellationToken);
        return updated is null ? NotFound() : Ok(updated);
    }

    [HttpDelete("{id}")]
    [ProducesResponseType(StatusCodes.Status204NoContent)]
    [ProducesResponseType(StatusCodes.Status404NotFound)]
    public async Task<IActionResult> Delete({{KEY_TYPE}} id, CancellationToken cancellationToken)
    {
        return await _service.DeleteAsync(id, cancellationToken) ? NoContent() : NotFound();
    }
}
"#;
